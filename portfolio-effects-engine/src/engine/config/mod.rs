//! Tunable effect parameters loaded from `assets/effects_config.json`.
//!
//! Every field has a built-in default, so a missing or partial file still
//! yields a complete configuration.

/// Asset loading of the configuration file at startup.
pub mod config_loader;

/// Configuration asset and resource shared by all effect systems.
pub mod effects_config;

/// `value` if it is finite and non-negative, otherwise `fallback`.
pub(crate) fn non_negative_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}
