use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::config::effects_config::EffectsConfig;
use crate::rpc::web_rpc::WebRpcInterface;

/// Smoothed frame rate, if frame time diagnostics are running.
pub fn current_fps(diagnostics: Option<&DiagnosticsStore>) -> Option<f32> {
    diagnostics?
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .map(|value| value as f32)
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    config: Res<EffectsConfig>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    if current_time - *last_send_time >= config.fps_notification_interval_secs {
        if let Some(fps) = current_fps(diagnostics.as_deref()) {
            rpc_interface.send_notification("fps_update", serde_json::json!({ "fps": fps }));
            *last_send_time = current_time;
        }
    }
}
