/// Number of particles in the ambient field
pub const PARTICLE_COUNT: u32 = 50;

/// Period between particle position updates (milliseconds)
pub const PARTICLE_TICK_INTERVAL_MS: u64 = 50;

/// Particle diameter range (pixels)
pub const PARTICLE_SIZE_RANGE: [f32; 2] = [1.0, 3.0];

/// Per-axis velocity range (pixels per tick)
pub const PARTICLE_VELOCITY_RANGE: [f32; 2] = [-0.25, 0.25];

/// Particle opacity range
pub const PARTICLE_OPACITY_RANGE: [f32; 2] = [0.1, 0.6];
