//! eframe screensaver shell. Feature `egui`.
//!
//! egui repaints every frame from scratch, so the canvas persistence the
//! engine's trail fade relies on is emulated: [`RetainedCanvas`] keeps the
//! recently drawn shapes and a translucent-black `fill_screen` decays
//! their alpha instead of painting over them. Shapes fall out of the
//! retained set once they are dimmer than one 8-bit alpha step.
//!
//! The shell owns the restart loop: when a cycle reaches
//! [`Stage::Done`], a new [`BlackHole`] is constructed with freshly
//! randomized parameters and a new generator thread.

use crate::black_hole::{BlackHole, BlackHoleConfig, Stage};
use crate::color::ColorTuple;
use crate::generator::{self, Bid, GeneratorConfig, GeneratorHandle};
use crate::random::{RandomSource, ThreadRandom};
use crate::spiral::SpiralConfig;
use crate::surface::{DrawSurface, Rect, Rgba};
use glam::Vec2;
use log::{debug, info};
use std::sync::mpsc;
use std::time::Instant;

/// Shapes dimmer than one 8-bit alpha step are dropped.
const MIN_RETAINED_ALPHA: f32 = 1.0 / 255.0;

enum RetainedShape {
    FilledCircle { center: Vec2, radius: f32 },
    StrokedCircle { center: Vec2, radius: f32, width: f32 },
    Segment { from: Vec2, to: Vec2, width: f32 },
}

struct Retained {
    shape: RetainedShape,
    color: ColorTuple,
    alpha: f32,
}

/// A [`DrawSurface`] that retains shapes across frames and decays them on
/// `fill_screen`, standing in for a persistent 2D canvas.
pub struct RetainedCanvas {
    rect: Rect,
    shapes: Vec<Retained>,
}

impl RetainedCanvas {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            shapes: Vec::new(),
        }
    }

    pub fn set_size(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    #[cfg(test)]
    fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Paint the retained shapes through an egui painter, offset by the
    /// panel origin.
    pub fn paint(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let pos = |point: Vec2| egui::pos2(origin.x + point.x, origin.y + point.y);
        for retained in &self.shapes {
            let [r, g, b] = retained.color;
            let color = egui::Color32::from_rgba_unmultiplied(
                r,
                g,
                b,
                (retained.alpha.clamp(0.0, 1.0) * 255.0) as u8,
            );
            match retained.shape {
                RetainedShape::FilledCircle { center, radius } => {
                    painter.circle_filled(pos(center), radius, color);
                }
                RetainedShape::StrokedCircle {
                    center,
                    radius,
                    width,
                } => {
                    painter.circle_stroke(pos(center), radius, egui::Stroke::new(width, color));
                }
                RetainedShape::Segment { from, to, width } => {
                    painter.line_segment([pos(from), pos(to)], egui::Stroke::new(width, color));
                }
            }
        }
    }

    fn push(&mut self, shape: RetainedShape, color: Rgba) {
        self.shapes.push(Retained {
            shape,
            color: color.color,
            alpha: color.alpha,
        });
    }
}

impl DrawSurface for RetainedCanvas {
    fn size(&self) -> Rect {
        self.rect
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.push(RetainedShape::FilledCircle { center, radius }, color);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.push(
            RetainedShape::StrokedCircle {
                center,
                radius,
                width,
            },
            color,
        );
    }

    fn line_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.push(RetainedShape::Segment { from, to, width }, color);
    }

    fn fill_screen(&mut self, color: Rgba) {
        let decay = 1.0 - color.alpha.clamp(0.0, 1.0);
        self.shapes.retain_mut(|retained| {
            retained.alpha *= decay;
            retained.alpha >= MIN_RETAINED_ALPHA
        });
    }
}

/// Fresh cycle with randomized spiral shape, handedness, off-center
/// placement, and a new generator thread.
fn new_cycle(rect: Rect) -> (BlackHole, mpsc::Receiver<Bid>, GeneratorHandle) {
    let mut rng = ThreadRandom::new();
    let config = BlackHoleConfig {
        spiral: SpiralConfig {
            c: rng.next_f32() + 1.0,
            clockwise: rng.next_f32() < 0.5,
            center_x_factor: 1.0 + rng.in_range(-0.2, 0.2),
            center_y_factor: 1.0 + rng.in_range(-0.2, 0.2),
            ..SpiralConfig::default()
        },
        ..BlackHoleConfig::default()
    };
    let hole = BlackHole::new(rect, config, Box::new(rng));
    let (sender, receiver) = mpsc::channel();
    let handle = generator::spawn(GeneratorConfig::default(), sender);
    (hole, receiver, handle)
}

pub struct ScreenSaverApp {
    hole: BlackHole,
    canvas: RetainedCanvas,
    receiver: mpsc::Receiver<Bid>,
    generator: GeneratorHandle,
    generator_killed: bool,
}

impl ScreenSaverApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let rect = Rect::new(1280.0, 800.0);
        let (hole, receiver, generator) = new_cycle(rect);
        info!("screensaver started");
        Self {
            hole,
            canvas: RetainedCanvas::new(rect),
            receiver,
            generator,
            generator_killed: false,
        }
    }

    fn restart(&mut self, rect: Rect) {
        debug!("cycle done, restarting with fresh parameters");
        self.generator.kill();
        let (hole, receiver, generator) = new_cycle(rect);
        self.hole = hole;
        self.receiver = receiver;
        self.generator = generator;
        self.generator_killed = false;
        self.canvas.clear();
    }
}

impl eframe::App for ScreenSaverApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let rect = Rect::new(available.x, available.y);
                if rect != self.canvas.size() && rect.width > 0.0 && rect.height > 0.0 {
                    self.canvas.set_size(rect);
                    self.hole.handle_resize(rect, Instant::now());
                }

                while let Ok(bid) = self.receiver.try_recv() {
                    self.hole.add_particle(bid);
                }
                if self.hole.is_kill() && !self.generator_killed {
                    self.generator.kill();
                    self.generator_killed = true;
                }

                self.hole.frame(&mut self.canvas, Instant::now());
                if self.hole.stage() == Stage::Done {
                    self.restart(rect);
                }

                let panel = ui.max_rect();
                let painter = ui.painter_at(panel);
                self.canvas.paint(&painter, panel.min);
            });
        ctx.request_repaint();
    }
}

/// Open the screensaver window. Window creation failure is fatal.
pub fn run() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_maximized(true)
            .with_title("spiralsink"),
        ..Default::default()
    };
    eframe::run_native(
        "spiralsink",
        options,
        Box::new(|cc| Ok(Box::new(ScreenSaverApp::new(cc)))),
    )
}
