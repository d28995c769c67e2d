use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::display_buffer::DisplayBuffer;
use crate::keymap::{KeyCode, KeyboardState, KeymapSampler, SymbolTable};
use crate::label::KeyLabelResolver;
use crate::surface::TextSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Sampling,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Codes that went down since the previous tick, ascending.
    pub pressed: Vec<KeyCode>,
    /// Number of labels inserted into the display buffer.
    pub inserted: usize,
    /// Whether the surface was asked to redraw.
    pub rendered: bool,
}

/// Fixed-interval polling loop: sample, diff, resolve, insert, render.
///
/// Any error from the keyboard or the surface ends the loop; there is no
/// retry.
pub struct SampleLoop<K, T, S> {
    keyboard: K,
    resolver: KeyLabelResolver<T>,
    surface: S,
    sampler: KeymapSampler,
    buffer: DisplayBuffer,
    interval: Duration,
    state: LoopState,
}

impl<K, T, S> SampleLoop<K, T, S>
where
    K: KeyboardState,
    T: SymbolTable,
    S: TextSurface,
{
    pub fn new(
        keyboard: K,
        resolver: KeyLabelResolver<T>,
        surface: S,
        sampler: KeymapSampler,
        buffer: DisplayBuffer,
        interval: Duration,
    ) -> Self {
        Self {
            keyboard,
            resolver,
            surface,
            sampler,
            buffer,
            interval,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Run one sampling pass without sleeping.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.state = LoopState::Sampling;
        let report = self.sample_once();
        self.state = LoopState::Idle;
        report
    }

    fn sample_once(&mut self) -> Result<TickReport> {
        let current = self.keyboard.sample().context("sample keyboard state")?;
        let pressed = self.sampler.tick(current);

        let mut inserted = 0;
        for &code in &pressed {
            let Some(label) = self.resolver.resolve(code, &self.surface)? else {
                continue;
            };
            tracing::trace!(%code, text = label.text(), width = label.width(), "key pressed");
            self.buffer.insert_front(label);
            inserted += 1;
        }

        let rendered = inserted > 0;
        if rendered {
            let text = self.buffer.render_text();
            let width = self.buffer.total_width();
            tracing::debug!(%text, width, "render overlay");
            self.surface
                .render(&text, width)
                .context("render overlay text")?;
        }

        Ok(TickReport {
            pressed,
            inserted,
            rendered,
        })
    }

    /// Tick every `interval` until `stop` is set or a tick fails.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            budget = self.buffer.budget(),
            policy = ?self.sampler.policy(),
            "sampling keyboard"
        );
        while !stop.load(Ordering::SeqCst) {
            std::thread::sleep(self.interval);
            if stop.load(Ordering::SeqCst) {
                break;
            }
            self.tick()?;
        }
        tracing::info!("sampling stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{EdgePolicy, Snapshot};
    use crate::surface::ConsoleSurface;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted(RefCell<VecDeque<Snapshot>>);

    impl KeyboardState for Scripted {
        fn sample(&self) -> Result<Snapshot> {
            Ok(self.0.borrow_mut().pop_front().unwrap_or_default())
        }
    }

    struct Letters;

    impl SymbolTable for Letters {
        fn symbol_name(&self, code: KeyCode) -> Option<String> {
            (code.0 < 26).then(|| char::from(b'a' + code.0).to_string())
        }
    }

    fn sample_loop(
        frames: Vec<Snapshot>,
    ) -> SampleLoop<Scripted, Letters, ConsoleSurface<Vec<u8>>> {
        SampleLoop::new(
            Scripted(RefCell::new(frames.into())),
            KeyLabelResolver::new(Letters),
            ConsoleSurface::new(Vec::new()),
            KeymapSampler::new(EdgePolicy::AllRising),
            DisplayBuffer::new(100),
            Duration::from_millis(1),
        )
    }

    #[test]
    fn tick_inserts_and_renders() {
        let mut sl = sample_loop(vec![Snapshot::with_pressed([KeyCode(0), KeyCode(1)])]);
        let report = sl.tick().unwrap();

        assert_eq!(report.pressed, vec![KeyCode(0), KeyCode(1)]);
        assert_eq!(report.inserted, 2);
        assert!(report.rendered);
        assert_eq!(sl.buffer().render_text(), "a b ");
        assert_eq!(sl.state(), LoopState::Idle);
    }

    #[test]
    fn unmapped_only_tick_does_not_render() {
        let mut sl = sample_loop(vec![Snapshot::with_pressed([KeyCode(100)])]);
        let report = sl.tick().unwrap();

        assert_eq!(report.pressed, vec![KeyCode(100)]);
        assert_eq!(report.inserted, 0);
        assert!(!report.rendered);
        assert!(sl.buffer().is_empty());
    }

    #[test]
    fn run_returns_when_stopped() {
        let mut sl = sample_loop(Vec::new());
        let stop = AtomicBool::new(true);
        sl.run(&stop).unwrap();
        assert!(sl.buffer().is_empty());
    }
}
