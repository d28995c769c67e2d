use std::path::Path;

use key_overlay::logging;
use key_overlay::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings_path = Settings::default_path();
    let settings = Settings::load(&settings_path)?;
    let log_guard = logging::init(
        settings.debug_logging,
        settings.log_dir.as_deref().map(Path::new),
    );
    tracing::debug!(path = %settings_path, ?settings, "loaded settings");

    let result = if settings.headless {
        platform::run_headless(&settings)
    } else {
        platform::run_windowed(&settings)
    };
    if let Err(err) = &result {
        tracing::error!("key overlay aborted: {err:#}");
    }
    // dropping the guard here flushes the file log before the error is printed
    drop(log_guard);
    result
}

#[cfg(all(unix, not(target_os = "macos")))]
mod platform {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::{channel, Sender};
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};

    use anyhow::{anyhow, Result};
    use eframe::egui;
    use key_overlay::keymap::x11::X11Keyboard;
    use key_overlay::keymap::KeymapSampler;
    use key_overlay::overlay::{self, EguiSurface, OverlayApp, RenderedLine};
    use key_overlay::settings::Settings;
    use key_overlay::surface::{ConsoleSurface, TextSurface};
    use key_overlay::{DisplayBuffer, KeyLabelResolver, SampleLoop};

    fn sample_until_stopped<S: TextSurface>(
        settings: &Settings,
        surface: S,
        stop: &AtomicBool,
    ) -> Result<()> {
        let keyboard = X11Keyboard::open()?;
        let mut sample_loop = SampleLoop::new(
            &keyboard,
            KeyLabelResolver::with_separator(&keyboard, settings.separator.clone()),
            surface,
            KeymapSampler::new(settings.edge_policy),
            DisplayBuffer::new(settings.display_width()),
            settings.sample_interval(),
        );
        sample_loop.run(stop)
    }

    /// Keys go to stdout; only process termination stops the loop.
    pub fn run_headless(settings: &Settings) -> Result<()> {
        let stop = AtomicBool::new(false);
        sample_until_stopped(settings, ConsoleSurface::stdout(), &stop)
    }

    fn spawn_sampler(
        settings: Settings,
        ctx: egui::Context,
        tx: Sender<RenderedLine>,
        stop: Arc<AtomicBool>,
    ) -> Result<JoinHandle<Result<()>>> {
        thread::Builder::new()
            .name("keymap-sampler".to_string())
            .spawn(move || {
                let surface = EguiSurface::new(ctx.clone(), settings.font_size, tx);
                let result = sample_until_stopped(&settings, surface, &stop);
                match result {
                    Err(err) if stop.load(Ordering::SeqCst) => {
                        tracing::debug!("sampler ended during shutdown: {err:#}");
                        Ok(())
                    }
                    Err(err) => {
                        stop.store(true, Ordering::SeqCst);
                        ctx.request_repaint();
                        Err(err)
                    }
                    ok => ok,
                }
            })
            .map_err(|err| anyhow!("failed to spawn keymap sampler thread: {err}"))
    }

    pub fn run_windowed(settings: &Settings) -> Result<()> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = channel();
        let sampler: Rc<Cell<Option<Result<JoinHandle<Result<()>>>>>> = Rc::new(Cell::new(None));

        let hook = {
            let settings = settings.clone();
            let stop = stop.clone();
            let sampler = sampler.clone();
            Box::new(move |ctx: egui::Context| {
                let spawned = spawn_sampler(settings, ctx, tx, stop.clone());
                if spawned.is_err() {
                    stop.store(true, Ordering::SeqCst);
                }
                sampler.set(Some(spawned));
            })
        };
        let app = OverlayApp::new(settings.font_size, rx, stop.clone(), hook);
        overlay::run_window(settings, app)?;

        stop.store(true, Ordering::SeqCst);
        match sampler.take() {
            Some(Ok(handle)) => handle
                .join()
                .map_err(|_| anyhow!("keymap sampler thread panicked"))?,
            Some(Err(err)) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
mod platform {
    use anyhow::{bail, Result};
    use key_overlay::settings::Settings;

    pub fn run_headless(_settings: &Settings) -> Result<()> {
        bail!("keyboard sampling requires an X11 display");
    }

    pub fn run_windowed(_settings: &Settings) -> Result<()> {
        bail!("keyboard sampling requires an X11 display");
    }
}
