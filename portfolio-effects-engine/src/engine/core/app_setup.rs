use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

// Crate engine modules
use crate::engine::config::config_loader::EffectsConfigPlugin;
use crate::engine::config::effects_config::EffectsConfig;
use crate::engine::core::app_state::{
    AppState, DisplayMode, LoadingProgress, advance_loading, announce_engine_ready,
    announce_loading_finished, transition_to_running,
};
use crate::engine::core::host_events::ScrollEvent;
use crate::engine::core::window_config::create_window_config;
use crate::engine::particles::field::{
    ParticleFieldState, manage_particle_field_lifecycle, tick_particle_field,
};
use crate::engine::particles::render::sync_particle_sprites;
use crate::engine::reveal::animator::{
    RegionEnteredEvent, RegionIndex, RegionLifecycleEvent, advance_reveal_animations,
    apply_region_lifecycle, start_reveal_animations,
};
use crate::engine::reveal::intersection::{
    IntersectionReportEvent, ObservationSupport, ViewportState, apply_intersection_reports,
    apply_scroll_to_viewport, evaluate_intersection_trackers,
};
use crate::engine::sections::header::{HeaderState, track_header_scrolled};
use crate::engine::sections::layout::SectionLayout;
use crate::engine::sections::locator::{
    NavigateToSectionEvent, SectionLocator, attach_section_listener, detach_section_listener,
    handle_navigate_to_section_events, track_active_section,
};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::theme::ThemeContext;
// Web RPC modules
use crate::rpc::web_rpc::WebRpcPlugin;

/// Per-frame ordering: decode host messages, apply them, animate, then flush replies.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectsSet {
    Rpc,
    Apply,
    Animate,
    Flush,
}

/// All effect state and systems, without windowing or rendering.
///
/// Runs headless under `MinimalPlugins` + `StatesPlugin`.
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_state::<DisplayMode>()
            .configure_sets(
                Update,
                (
                    EffectsSet::Rpc,
                    EffectsSet::Apply,
                    EffectsSet::Animate,
                    EffectsSet::Flush,
                )
                    .chain(),
            )
            .add_plugins(WebRpcPlugin);

        // Initialise resources early
        app.init_resource::<EffectsConfig>()
            .init_resource::<LoadingProgress>()
            .init_resource::<ViewportState>()
            .init_resource::<ObservationSupport>()
            .init_resource::<RegionIndex>()
            .init_resource::<SectionLayout>()
            .init_resource::<SectionLocator>()
            .init_resource::<HeaderState>()
            .init_resource::<ThemeContext>()
            .init_resource::<ParticleFieldState>()
            .add_event::<ScrollEvent>()
            .add_event::<NavigateToSectionEvent>()
            .add_event::<RegionLifecycleEvent>()
            .add_event::<IntersectionReportEvent>()
            .add_event::<RegionEnteredEvent>();

        // Lifecycle
        app.add_systems(Startup, announce_engine_ready)
            .add_systems(
                Update,
                (advance_loading, transition_to_running)
                    .chain()
                    .run_if(in_state(AppState::Loading)),
            )
            .add_systems(OnEnter(AppState::Running), announce_loading_finished)
            .add_systems(OnEnter(DisplayMode::Portfolio), attach_section_listener)
            .add_systems(OnExit(DisplayMode::Portfolio), detach_section_listener);

        // Host input, in the order it must be applied
        app.add_systems(
            Update,
            (
                apply_scroll_to_viewport,
                track_active_section,
                handle_navigate_to_section_events,
                track_header_scrolled,
                apply_region_lifecycle,
                apply_intersection_reports,
                evaluate_intersection_trackers,
            )
                .chain()
                .in_set(EffectsSet::Apply),
        );

        app.add_systems(
            Update,
            (
                (start_reveal_animations, advance_reveal_animations).chain(),
                (manage_particle_field_lifecycle, tick_particle_field)
                    .chain()
                    .run_if(in_state(AppState::Running)),
            )
                .in_set(EffectsSet::Animate),
        );
    }
}

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(EffectsPlugin)
        .add_plugins(EffectsConfigPlugin)
        // The page shows through everything but the particles.
        .insert_resource(ClearColor(Color::NONE));

    app.add_systems(Startup, setup).add_systems(
        Update,
        (
            sync_particle_sprites.after(tick_particle_field),
            fps_notification_system,
        )
            .in_set(EffectsSet::Animate),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            sync_viewport_from_window.in_set(EffectsSet::Apply).before(apply_scroll_to_viewport),
        );
    }

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}

// Without a host page the window itself is the viewport.
#[cfg(not(target_arch = "wasm32"))]
fn sync_viewport_from_window(
    windows: Query<&Window, With<bevy::window::PrimaryWindow>>,
    mut viewport: ResMut<ViewportState>,
) {
    if viewport.rect().is_some() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    viewport.set(crate::engine::reveal::intersection::RegionRect::new(
        0.0,
        0.0,
        window.width(),
        window.height(),
    ));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
