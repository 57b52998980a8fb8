use bevy::prelude::*;

use crate::engine::config::effects_config::EffectsConfig;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Which page the host router is showing. Section tracking only runs on the portfolio.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum DisplayMode {
    #[default]
    Portfolio,
    Admin,
}

impl DisplayMode {
    /// Convert string identifier to a display mode for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "portfolio" => Some(Self::Portfolio),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
            Self::Admin => "admin",
        }
    }
}

#[derive(Resource, Default)]
pub struct LoadingProgress {
    /// Seconds spent on the loading screen so far.
    pub elapsed: f32,
    /// Set while the config asset is still in flight.
    pub pending_config: bool,
}

pub fn advance_loading(time: Res<Time>, mut loading_progress: ResMut<LoadingProgress>) {
    loading_progress.elapsed += time.delta_secs();
}

// Leave the loading screen once it has shown long enough and config has resolved.
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    config: Res<EffectsConfig>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.elapsed >= config.loading_screen_secs && !loading_progress.pending_config {
        info!("→ Loading finished, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

pub fn announce_engine_ready(mut rpc_interface: ResMut<WebRpcInterface>) {
    rpc_interface.send_notification(
        "engine_ready",
        serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }),
    );
}

pub fn announce_loading_finished(mut rpc_interface: ResMut<WebRpcInterface>) {
    rpc_interface.send_notification("loading_finished", serde_json::json!({}));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mode_from_string() {
        assert_eq!(DisplayMode::from_string("Admin"), Some(DisplayMode::Admin));
        assert_eq!(DisplayMode::from_string("portfolio"), Some(DisplayMode::Portfolio));
        assert_eq!(DisplayMode::from_string("kiosk"), None);
    }
}
