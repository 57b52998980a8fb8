use bevy::prelude::*;

/// CSS selector of the canvas the engine renders into on the web.
pub const CANVAS_SELECTOR: &str = "#portfolio-effects";

/// Base tint of particle sprites; alpha is replaced per particle.
pub const PARTICLE_COLOUR: Color = Color::srgb(1.0, 1.0, 1.0);

/// Depth of particle sprites so they sit above the cleared background.
pub const PARTICLE_Z: f32 = 1.0;

/// Path of the effects configuration asset, relative to the asset root.
pub const EFFECTS_CONFIG_PATH: &str = "effects_config.json";
