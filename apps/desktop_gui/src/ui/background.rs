//! Painted constellation backdrop behind every panel.

use std::time::{Duration, Instant};

use constellation::{Animator, Breath, Constellation, ConstellationConfig, Rgb, Viewport};
use eframe::egui;

const BASE_FILL: egui::Color32 = egui::Color32::from_rgb(6, 10, 24);
const PRIMARY_GLOW: Rgb = Rgb(0x00, 0xaa, 0xff);
const SECONDARY_GLOW: Rgb = Rgb(0x00, 0xf5, 0xff);
const GLOW_RINGS: usize = 14;
const PARTICLE_ALPHA: f32 = 0.8;
const LINK_WIDTH: f32 = 1.0;

pub struct ConstellationBackground {
    model: Constellation,
    animator: Animator,
    breath: Breath,
    started: Instant,
}

impl ConstellationBackground {
    pub fn new(config: ConstellationConfig) -> Self {
        let mut rng = rand::rng();
        Self {
            model: Constellation::new(config, &mut rng),
            animator: Animator::default(),
            breath: Breath::default(),
            started: Instant::now(),
        }
    }

    /// Advances the animation clock and paints one frame on the background
    /// layer. Returns the time until the next scheduled link rebuild or breath.
    pub fn paint(&mut self, ctx: &egui::Context) -> Duration {
        let rect = ctx.screen_rect();
        let elapsed = self.started.elapsed();
        let viewport = Viewport::new(rect.width(), rect.height());

        let tick = self.animator.advance(elapsed);
        for _ in 0..tick.breath_ticks {
            self.breath.tick();
        }
        if tick.rebuild && rect.width() > 0.0 && rect.height() > 0.0 {
            self.model.rebuild_connections(viewport);
        }

        let painter = ctx.layer_painter(egui::LayerId::background());
        painter.rect_filled(rect, 0.0, BASE_FILL);
        paint_glow(
            &painter,
            rect.min + egui::vec2(rect.width() * 0.2, rect.height() * 0.5),
            rect.width().max(rect.height()) * 0.45,
            PRIMARY_GLOW,
            self.breath.primary_opacity(),
        );
        paint_glow(
            &painter,
            rect.min + egui::vec2(rect.width() * 0.8, rect.height() * 0.2),
            rect.width().max(rect.height()) * 0.35,
            SECONDARY_GLOW,
            self.breath.secondary_opacity(),
        );

        let positions: Vec<egui::Pos2> = self
            .model
            .particles()
            .iter()
            .map(|particle| {
                let (x, y) = particle.position_px(viewport);
                rect.min + egui::vec2(x, y + particle.drift_px(elapsed))
            })
            .collect();

        for link in self.model.connections() {
            let color = rgba(PRIMARY_GLOW, link.opacity);
            painter.line_segment(
                [positions[link.from], positions[link.to]],
                egui::Stroke::new(LINK_WIDTH, color),
            );
        }
        for (particle, pos) in self.model.particles().iter().zip(&positions) {
            painter.circle_filled(*pos, particle.size_px / 2.0, rgba(particle.color, PARTICLE_ALPHA));
        }

        self.animator.until_next_event(elapsed)
    }
}

/// Radial glow approximated by concentric translucent discs.
fn paint_glow(painter: &egui::Painter, center: egui::Pos2, radius: f32, color: Rgb, opacity: f32) {
    let per_ring = opacity / GLOW_RINGS as f32;
    for ring in 0..GLOW_RINGS {
        let r = radius * (1.0 - ring as f32 / GLOW_RINGS as f32);
        painter.circle_filled(center, r, rgba(color, per_ring));
    }
}

fn rgba(color: Rgb, alpha: f32) -> egui::Color32 {
    let Rgb(r, g, b) = color;
    egui::Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}
