//! Decorative "constellation" background: randomly placed particles joined by
//! faint links whenever two of them sit close enough on screen.
//!
//! Nothing here talks to the outside world. The GUI owns a [`Constellation`],
//! feeds elapsed time into an [`Animator`] and paints whatever the model holds.

use std::{f32::consts::TAU, time::Duration};

use rand::Rng;
use tracing::trace;

pub const DEFAULT_PARTICLE_COUNT: usize = 120;
pub const DEFAULT_CONNECTION_THRESHOLD_PX: f32 = 150.0;
const MAX_CONNECTION_OPACITY: f32 = 0.7;
const MIN_PARTICLE_SIZE_PX: f32 = 3.0;
const PARTICLE_SIZE_SPAN_PX: f32 = 7.0;
const MAX_ANIMATION_DELAY_SECS: f32 = 5.0;
const MIN_ANIMATION_DURATION_SECS: f32 = 8.0;
const ANIMATION_DURATION_SPAN_SECS: f32 = 10.0;

const INITIAL_REBUILD_AFTER: Duration = Duration::from_millis(500);
const REBUILD_INTERVAL: Duration = Duration::from_millis(2500);
const BREATH_INTERVAL: Duration = Duration::from_millis(100);
const BREATH_STEP: f32 = 0.02;

/// Bright blue palette particles pick their color from.
pub const PALETTE: [Rgb; 4] = [
    Rgb(0x00, 0xaa, 0xff),
    Rgb(0x00, 0xcc, 0xff),
    Rgb(0x00, 0xf5, 0xff),
    Rgb(0x66, 0xcc, 0xff),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationConfig {
    pub particle_count: usize,
    pub connection_threshold_px: f32,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            connection_threshold_px: DEFAULT_CONNECTION_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Horizontal position in percent of the viewport width.
    pub x_pct: f32,
    /// Vertical position in percent of the viewport height.
    pub y_pct: f32,
    pub size_px: f32,
    pub color: Rgb,
    pub animation_delay: Duration,
    pub animation_duration: Duration,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x_pct: rng.random_range(0.0..100.0),
            y_pct: rng.random_range(0.0..100.0),
            size_px: MIN_PARTICLE_SIZE_PX + rng.random::<f32>() * PARTICLE_SIZE_SPAN_PX,
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            animation_delay: Duration::from_secs_f32(
                rng.random::<f32>() * MAX_ANIMATION_DELAY_SECS,
            ),
            animation_duration: Duration::from_secs_f32(
                MIN_ANIMATION_DURATION_SECS + rng.random::<f32>() * ANIMATION_DURATION_SPAN_SECS,
            ),
        }
    }

    pub fn position_px(&self, viewport: Viewport) -> (f32, f32) {
        (
            self.x_pct * viewport.width / 100.0,
            self.y_pct * viewport.height / 100.0,
        )
    }

    /// Vertical float offset at `elapsed`, an ease-in-out swing of about one
    /// particle size. Zero until the particle's animation delay has passed.
    pub fn drift_px(&self, elapsed: Duration) -> f32 {
        if elapsed < self.animation_delay || self.animation_duration.is_zero() {
            return 0.0;
        }
        let cycle = (elapsed - self.animation_delay).as_secs_f32()
            / self.animation_duration.as_secs_f32();
        self.size_px * (cycle.fract() * TAU).sin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    pub length_px: f32,
    pub angle_deg: f32,
    pub opacity: f32,
}

/// Pixel offset and distance between two particles for the given viewport.
pub fn pixel_distance(a: &Particle, b: &Particle, viewport: Viewport) -> (f32, f32, f32) {
    let dx = (a.x_pct - b.x_pct) * viewport.width / 100.0;
    let dy = (a.y_pct - b.y_pct) * viewport.height / 100.0;
    (dx, dy, (dx * dx + dy * dy).sqrt())
}

#[derive(Debug, Clone)]
pub struct Constellation {
    config: ConstellationConfig,
    particles: Vec<Particle>,
    connections: Vec<Connection>,
    rebuilds: u64,
}

impl Constellation {
    pub fn new<R: Rng + ?Sized>(config: ConstellationConfig, rng: &mut R) -> Self {
        let particles = (0..config.particle_count)
            .map(|_| Particle::random(rng))
            .collect();
        Self::from_particles(config, particles)
    }

    pub fn from_particles(config: ConstellationConfig, particles: Vec<Particle>) -> Self {
        Self {
            config,
            particles,
            connections: Vec::new(),
            rebuilds: 0,
        }
    }

    pub fn config(&self) -> ConstellationConfig {
        self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Drops every existing link and recomputes the full set for `viewport`.
    /// A threshold that is not a positive finite distance links nothing.
    pub fn rebuild_connections(&mut self, viewport: Viewport) -> &[Connection] {
        let threshold = self.config.connection_threshold_px;
        self.connections.clear();
        let linkable = if threshold.is_finite() && threshold > 0.0 {
            self.particles.len()
        } else {
            0
        };

        for i in 0..linkable {
            for j in (i + 1)..linkable {
                let (dx, dy, distance) =
                    pixel_distance(&self.particles[i], &self.particles[j], viewport);
                if distance >= threshold {
                    continue;
                }
                self.connections.push(Connection {
                    from: i,
                    to: j,
                    length_px: distance,
                    angle_deg: dy.atan2(dx).to_degrees(),
                    opacity: (1.0 - distance / threshold) * MAX_CONNECTION_OPACITY,
                });
            }
        }

        self.rebuilds += 1;
        trace!(
            connections = self.connections.len(),
            rebuild = self.rebuilds,
            "rebuilt constellation links"
        );
        &self.connections
    }
}

/// Slow sine "breathing" of the two background gradients.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Breath {
    phase: f32,
}

impl Breath {
    pub fn tick(&mut self) {
        self.phase += BREATH_STEP;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn primary_opacity(&self) -> f32 {
        0.1 + 0.05 * self.phase.sin()
    }

    pub fn secondary_opacity(&self) -> f32 {
        0.05 + 0.03 * (self.phase + 1.0).sin()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimatorTick {
    pub rebuild: bool,
    pub breath_ticks: u32,
}

/// Converts elapsed render time into the periodic events of the background:
/// a first link build at 500 ms, a rebuild every 2.5 s and a breath step every
/// 100 ms. Missed periods collapse into a single rebuild.
#[derive(Debug, Clone)]
pub struct Animator {
    initial_build_pending: bool,
    next_rebuild: Duration,
    next_breath: Duration,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            initial_build_pending: true,
            next_rebuild: REBUILD_INTERVAL,
            next_breath: BREATH_INTERVAL,
        }
    }
}

impl Animator {
    pub fn advance(&mut self, elapsed: Duration) -> AnimatorTick {
        let mut tick = AnimatorTick::default();

        if self.initial_build_pending && elapsed >= INITIAL_REBUILD_AFTER {
            self.initial_build_pending = false;
            tick.rebuild = true;
        }
        while elapsed >= self.next_rebuild {
            tick.rebuild = true;
            self.next_rebuild += REBUILD_INTERVAL;
        }
        while elapsed >= self.next_breath {
            tick.breath_ticks += 1;
            self.next_breath += BREATH_INTERVAL;
        }

        tick
    }

    /// Time until the next scheduled event, for repaint scheduling.
    pub fn until_next_event(&self, elapsed: Duration) -> Duration {
        let mut next = self.next_breath.min(self.next_rebuild);
        if self.initial_build_pending {
            next = next.min(INITIAL_REBUILD_AFTER);
        }
        next.saturating_sub(elapsed)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
