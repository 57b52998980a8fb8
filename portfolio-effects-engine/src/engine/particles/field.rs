use std::time::Duration;

use bevy::prelude::*;
use constants::particles::{
    PARTICLE_COUNT, PARTICLE_OPACITY_RANGE, PARTICLE_SIZE_RANGE, PARTICLE_TICK_INTERVAL_MS,
    PARTICLE_VELOCITY_RANGE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::engine::config::effects_config::EffectsConfig;
use crate::engine::reveal::intersection::ViewportState;

/// A single drifting dot. Positions are page pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub position: Vec2,
    pub size: f32,
    /// Pixels moved per tick.
    pub velocity: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    pub count: u32,
    pub tick_interval_ms: u64,
    pub size_range: [f32; 2],
    pub velocity_range: [f32; 2],
    pub opacity_range: [f32; 2],
    /// Fixed seed for reproducible fields. Entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            tick_interval_ms: PARTICLE_TICK_INTERVAL_MS,
            size_range: PARTICLE_SIZE_RANGE,
            velocity_range: PARTICLE_VELOCITY_RANGE,
            opacity_range: PARTICLE_OPACITY_RANGE,
            seed: None,
        }
    }
}

impl ParticleFieldConfig {
    /// Order range bounds, drop non-finite ones and keep the tick period positive.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            count: self.count,
            tick_interval_ms: if self.tick_interval_ms == 0 {
                defaults.tick_interval_ms
            } else {
                self.tick_interval_ms
            },
            size_range: ordered_range(self.size_range, defaults.size_range),
            velocity_range: ordered_range(self.velocity_range, defaults.velocity_range),
            opacity_range: ordered_range(self.opacity_range, defaults.opacity_range),
            seed: self.seed,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

fn ordered_range(range: [f32; 2], fallback: [f32; 2]) -> [f32; 2] {
    let [a, b] = range;
    if !a.is_finite() || !b.is_finite() {
        return fallback;
    }
    [a.min(b), a.max(b)]
}

/// Uniform sample from `[lo, hi]`; collapses to `lo` for an empty range.
fn sample_range<R: Rng + ?Sized>(rng: &mut R, [lo, hi]: [f32; 2]) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Largest representable value strictly below `extent`.
fn last_inside(extent: f32) -> f32 {
    if extent > 0.0 {
        f32::from_bits(extent.to_bits() - 1)
    } else {
        0.0
    }
}

/// Toroidal wrap of one coordinate onto `[0, extent)`.
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    if value >= extent {
        0.0
    } else if value < 0.0 {
        last_inside(extent)
    } else {
        value
    }
}

/// Fixed set of particles drifting over a viewport captured at spawn time.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    extent: Vec2,
    ticks: u64,
}

impl ParticleField {
    pub fn spawn<R: Rng + ?Sized>(config: &ParticleFieldConfig, extent: Vec2, rng: &mut R) -> Self {
        let extent = extent.max(Vec2::ZERO);
        let particles = (0..config.count)
            .map(|id| Particle {
                id,
                position: Vec2::new(
                    sample_range(&mut *rng, [0.0, last_inside(extent.x)]),
                    sample_range(&mut *rng, [0.0, last_inside(extent.y)]),
                ),
                size: sample_range(&mut *rng, config.size_range),
                velocity: Vec2::new(
                    sample_range(&mut *rng, config.velocity_range),
                    sample_range(&mut *rng, config.velocity_range),
                ),
                opacity: sample_range(&mut *rng, config.opacity_range),
            })
            .collect();

        Self {
            particles,
            extent,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) {
        let extent = self.extent;
        for particle in &mut self.particles {
            let moved = particle.position + particle.velocity;
            particle.position = Vec2::new(wrap_axis(moved.x, extent.x), wrap_axis(moved.y, extent.y));
        }
        self.ticks += 1;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    let high = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let low = js_sys::Date::now() as u64;
    (high << 32) ^ low
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Lifecycle of the ambient field: enabled by the host, active once spawned.
#[derive(Resource, Debug)]
pub struct ParticleFieldState {
    enabled: bool,
    field: Option<ParticleField>,
    timer: Timer,
}

impl Default for ParticleFieldState {
    fn default() -> Self {
        Self {
            enabled: true,
            field: None,
            timer: Timer::new(
                Duration::from_millis(PARTICLE_TICK_INTERVAL_MS),
                TimerMode::Repeating,
            ),
        }
    }
}

impl ParticleFieldState {
    pub fn activate(&mut self, config: &ParticleFieldConfig, extent: Vec2) {
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(entropy_seed));
        self.activate_with_rng(config, extent, &mut rng);
    }

    pub fn activate_with_rng<R: Rng + ?Sized>(
        &mut self,
        config: &ParticleFieldConfig,
        extent: Vec2,
        rng: &mut R,
    ) {
        self.field = Some(ParticleField::spawn(config, extent, rng));
        self.timer = Timer::new(config.tick_interval(), TimerMode::Repeating);
    }

    pub fn deactivate(&mut self) {
        self.field = None;
        self.timer.pause();
        self.timer.reset();
    }

    /// Run every tick that fell due within `delta`. Returns the number applied.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        let Some(field) = self.field.as_mut() else {
            return 0;
        };

        self.timer.tick(delta);
        let due = self.timer.times_finished_this_tick();
        for _ in 0..due {
            field.tick();
        }
        due
    }

    pub fn is_active(&self) -> bool {
        self.field.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }
}

/// Spawn the field once enabled and the viewport size is known; tear it down when disabled.
pub fn manage_particle_field_lifecycle(
    mut state: ResMut<ParticleFieldState>,
    viewport: Res<ViewportState>,
    config: Res<EffectsConfig>,
) {
    if state.is_enabled() && !state.is_active() {
        let Some(extent) = viewport.size() else {
            return;
        };
        state.activate(&config.particles, extent);
        info!(
            "Particle field active: {} particles over {}x{}",
            config.particles.count, extent.x, extent.y
        );
    } else if !state.is_enabled() && state.is_active() {
        state.deactivate();
        info!("Particle field deactivated");
    }
}

pub fn tick_particle_field(time: Res<Time>, mut state: ResMut<ParticleFieldState>) {
    if state.is_active() {
        state.advance(time.delta());
    }
}
