//! Always-on-top overlay window showing the most recent keys.
//!
//! The window runs on the main thread. The sampler runs on its own thread
//! and talks to the window through [`EguiSurface`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use eframe::egui;

use crate::settings::Settings;
use crate::surface::TextSurface;

const FG: egui::Color32 = egui::Color32::WHITE;
const BG: egui::Color32 = egui::Color32::BLACK;

/// Text handed from the sampler to the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub width: u32,
}

/// Measures with the egui font system and forwards renders to the window.
///
/// Measuring is only valid once the window has drawn its first frame.
pub struct EguiSurface {
    ctx: egui::Context,
    font: egui::FontId,
    tx: Sender<RenderedLine>,
}

impl EguiSurface {
    pub fn new(ctx: egui::Context, font_size: f32, tx: Sender<RenderedLine>) -> Self {
        Self {
            ctx,
            font: egui::FontId::proportional(font_size),
            tx,
        }
    }
}

impl TextSurface for EguiSurface {
    fn measure_text(&self, text: &str) -> Result<u32> {
        let width = self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(text.to_owned(), self.font.clone(), FG)
                .size()
                .x
        });
        Ok(width.ceil().max(0.0) as u32)
    }

    fn render(&mut self, text: &str, width: u32) -> Result<()> {
        self.tx
            .send(RenderedLine {
                text: text.to_owned(),
                width,
            })
            .map_err(|_| anyhow!("overlay window is gone"))?;
        self.ctx.request_repaint();
        Ok(())
    }
}

/// Called once with the window's context after the first frame.
pub type FirstFrameHook = Box<dyn FnOnce(egui::Context)>;

pub struct OverlayApp {
    rx: Receiver<RenderedLine>,
    line: Option<RenderedLine>,
    font: egui::FontId,
    stop: Arc<AtomicBool>,
    on_first_frame: Option<FirstFrameHook>,
}

impl OverlayApp {
    pub fn new(
        font_size: f32,
        rx: Receiver<RenderedLine>,
        stop: Arc<AtomicBool>,
        on_first_frame: FirstFrameHook,
    ) -> Self {
        Self {
            rx,
            line: None,
            font: egui::FontId::proportional(font_size),
            stop,
            on_first_frame: Some(on_first_frame),
        }
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(hook) = self.on_first_frame.take() {
            hook(ctx.clone());
        }

        while let Ok(line) = self.rx.try_recv() {
            self.line = Some(line);
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            tracing::debug!("overlay window closed");
            self.stop.store(true, Ordering::SeqCst);
        } else if self.stop.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BG))
            .show(ctx, |ui| {
                let Some(line) = &self.line else {
                    return;
                };
                let origin = ui.max_rect().left_top();
                let clip = egui::Rect::from_min_size(
                    origin,
                    egui::vec2(line.width as f32, ui.max_rect().height()),
                );
                ui.painter().with_clip_rect(clip).text(
                    origin,
                    egui::Align2::LEFT_TOP,
                    &line.text,
                    self.font.clone(),
                    FG,
                );
            });

        // keep polling the stop flag while no keys arrive
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

pub fn native_options(settings: &Settings) -> eframe::NativeOptions {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title("key_overlay")
        .with_inner_size([settings.display_width() as f32, settings.window_height as f32])
        .with_decorations(false)
        .with_resizable(false)
        .with_always_on_top();
    if let Some((x, y)) = settings.window_pos {
        viewport = viewport.with_position([x as f32, y as f32]);
    }
    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

/// Block on the overlay window until it closes.
pub fn run_window(settings: &Settings, app: OverlayApp) -> Result<()> {
    eframe::run_native(
        "key_overlay",
        native_options(settings),
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|err| anyhow!("failed to run overlay window: {err}"))
}
