use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::EFFECTS_CONFIG_PATH;

use crate::engine::config::effects_config::EffectsConfig;
use crate::engine::core::app_state::{AppState, LoadingProgress};

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<EffectsConfig>>,
}

/// Registers the JSON config asset and swaps it in once loaded.
pub struct EffectsConfigPlugin;

impl Plugin for EffectsConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<EffectsConfig>::new(&["json"]))
            .init_resource::<ConfigLoader>()
            .add_systems(Startup, start_config_loading)
            .add_systems(
                Update,
                load_config_system.run_if(in_state(AppState::Loading)),
            );
    }
}

// Kick off the config load; the loading phase waits on it.
pub fn start_config_loading(
    mut config_loader: ResMut<ConfigLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    config_loader.handle = Some(asset_server.load(EFFECTS_CONFIG_PATH));
    loading_progress.pending_config = true;
}

// Replace the default config with the loaded one, or keep defaults on failure.
pub fn load_config_system(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    config_loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<EffectsConfig>>,
) {
    if !loading_progress.pending_config {
        return;
    }

    let Some(ref handle) = config_loader.handle else {
        return;
    };

    if let Some(config) = configs.get(handle) {
        info!("✓ Effects config loaded");
        commands.insert_resource(config.clone().sanitized());
        loading_progress.pending_config = false;
    } else if let LoadState::Failed(error) = asset_server.load_state(handle) {
        warn!("Effects config unavailable, using defaults: {}", error);
        loading_progress.pending_config = false;
    }
}
