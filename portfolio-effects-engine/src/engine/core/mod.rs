//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Builds the headless effects plugin and the full windowed app around it.
pub mod app_setup;

/// Loading and display mode state machines.
pub mod app_state;

/// Events carrying raw page input from the host.
pub mod host_events;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures transparent canvas integration for web targets and vsync settings.
pub mod window_config;
