use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::engine::config::effects_config::EffectsConfig;
use crate::engine::core::app_state::DisplayMode;
use crate::engine::core::host_events::ScrollEvent;
use crate::engine::error::{self, EffectsError};
use crate::engine::particles::field::ParticleFieldState;
use crate::engine::reveal::animator::RegionLifecycleEvent;
use crate::engine::reveal::intersection::{
    IntersectionReportEvent, ObservationSupport, RegionRect, ViewportState,
};
use crate::engine::reveal::options::{RevealDirection, RevealOptions, lenient_direction, lenient_seconds};
use crate::engine::reveal::stagger::StaggerConfig;
use crate::engine::sections::layout::{SectionBounds, SectionLayout};
use crate::engine::sections::locator::{NavigateToSectionEvent, SectionLocator};
use crate::engine::sections::section_id::SectionId;
use crate::engine::systems::fps_tracking::current_fps;
use crate::engine::theme::{Theme, ThemeContext};
use crate::rpc::web_rpc::WebRpcInterface;

/// Engine state the RPC handlers read or update directly.
#[derive(SystemParam)]
pub struct EffectsState<'w> {
    viewport: ResMut<'w, ViewportState>,
    layout: ResMut<'w, SectionLayout>,
    observation: ResMut<'w, ObservationSupport>,
    theme: ResMut<'w, ThemeContext>,
    particles: ResMut<'w, ParticleFieldState>,
    locator: ResMut<'w, SectionLocator>,
    config: Res<'w, EffectsConfig>,
    display_mode: Res<'w, State<DisplayMode>>,
    next_display_mode: ResMut<'w, NextState<DisplayMode>>,
    diagnostics: Option<Res<'w, DiagnosticsStore>>,
}

/// Events the RPC handlers hand off to engine systems.
#[derive(SystemParam)]
pub struct EffectsCommands<'w> {
    scroll: EventWriter<'w, ScrollEvent>,
    regions: EventWriter<'w, RegionLifecycleEvent>,
    intersections: EventWriter<'w, IntersectionReportEvent>,
    navigate: EventWriter<'w, NavigateToSectionEvent>,
}

/// Route a method to its handler. `None` when the method is unknown.
pub fn dispatch(
    method: &str,
    params: &Value,
    state: &mut EffectsState,
    commands: &mut EffectsCommands,
    rpc_interface: &mut WebRpcInterface,
) -> Option<error::Result<Value>> {
    let result = match method {
        "init" => handle_init(params, state, rpc_interface),
        "viewport_changed" => handle_viewport_changed(params, state, commands),
        "scroll" => handle_scroll(params, state, commands),
        "section_layout" => handle_section_layout(params, state),
        "register_region" => handle_register_region(params, state, commands),
        "register_staggered_group" => handle_register_staggered_group(params, state, commands),
        "unregister_region" => handle_unregister_region(params, commands),
        "intersection_entries" => handle_intersection_entries(params, commands),
        "navigate_to_section" => handle_navigate_to_section(params, state, commands),
        "get_active_section" => Ok(json!({ "section": state.locator.active().as_str() })),
        "set_display_mode" => handle_set_display_mode(params, state),
        "set_theme" => handle_set_theme(params, state, rpc_interface),
        "toggle_theme" => handle_toggle_theme(state, rpc_interface),
        "set_particle_field_active" => handle_set_particle_field_active(params, state),
        "get_fps" => handle_get_fps(state),
        _ => return None,
    };
    Some(result)
}

/// Deserialize method params; a missing params member reads as `{}`.
fn parse_params<T: DeserializeOwned>(params: &Value) -> error::Result<T> {
    let params = if params.is_null() { json!({}) } else { params.clone() };
    Ok(serde_json::from_value(params)?)
}

#[derive(Deserialize)]
struct ViewportParams {
    #[serde(default)]
    scroll_x: f32,
    #[serde(default)]
    scroll_y: f32,
    width: f32,
    height: f32,
}

impl ViewportParams {
    fn rect(&self) -> RegionRect {
        RegionRect::new(self.scroll_x, self.scroll_y, self.width.max(0.0), self.height.max(0.0))
    }
}

/// Capabilities, initial viewport and theme bootstrap sent once by the host.
fn handle_init(
    params: &Value,
    state: &mut EffectsState,
    rpc_interface: &mut WebRpcInterface,
) -> error::Result<Value> {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct InitParams {
        viewport: Option<ViewportParams>,
        intersection_observer: Option<bool>,
        stored_theme: Option<String>,
        prefers_dark: bool,
    }

    let init = parse_params::<InitParams>(params)?;

    if let Some(viewport) = &init.viewport {
        state.viewport.set(viewport.rect());
    }

    if let Some(available) = init.intersection_observer {
        state.observation.available = available;
        if !available {
            info!("Host has no intersection observer, reveals will show immediately");
        }
    }

    if let Some(theme) = state
        .theme
        .initialise(init.stored_theme.as_deref(), init.prefers_dark)
    {
        rpc_interface.send_notification(
            "theme_changed",
            json!({ "theme": theme.as_str(), "persist": false }),
        );
    }

    Ok(json!({
        "success": true,
        "version": env!("CARGO_PKG_VERSION"),
        "theme": state.theme.theme().as_str(),
        "active_section": state.locator.active().as_str()
    }))
}

fn handle_viewport_changed(
    params: &Value,
    state: &mut EffectsState,
    commands: &mut EffectsCommands,
) -> error::Result<Value> {
    let viewport = parse_params::<ViewportParams>(params)?;
    state.viewport.set(viewport.rect());
    commands.scroll.write(ScrollEvent {
        scroll_x: viewport.scroll_x,
        scroll_y: viewport.scroll_y,
        portfolio: state.locator.is_listening(),
    });
    Ok(json!({ "success": true }))
}

fn handle_scroll(
    params: &Value,
    state: &EffectsState,
    commands: &mut EffectsCommands,
) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct ScrollParams {
        scroll_y: f32,
        #[serde(default)]
        scroll_x: f32,
    }

    let scroll = parse_params::<ScrollParams>(params)?;
    commands.scroll.write(ScrollEvent {
        scroll_x: scroll.scroll_x,
        scroll_y: scroll.scroll_y,
        portfolio: state.locator.is_listening(),
    });
    Ok(json!({ "success": true }))
}

/// Replace the section layout. Ids outside the fixed set are ignored.
fn handle_section_layout(params: &Value, state: &mut EffectsState) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct SectionEntry {
        id: String,
        top: f32,
        height: f32,
    }

    #[derive(Deserialize)]
    struct SectionLayoutParams {
        sections: Vec<SectionEntry>,
    }

    let layout_params = parse_params::<SectionLayoutParams>(params)?;
    let entries = layout_params.sections.iter().filter_map(|entry| {
        match SectionId::from_string(&entry.id) {
            Some(section) => Some((section, SectionBounds::new(entry.top, entry.height))),
            None => {
                debug!("{}", EffectsError::UnknownSection(entry.id.clone()));
                None
            }
        }
    });
    let layout = SectionLayout::from_entries(entries);

    let sections: Vec<&str> = SectionId::ALL
        .iter()
        .filter(|section| layout.contains_section(**section))
        .map(SectionId::as_str)
        .collect();
    *state.layout = layout;

    Ok(json!({ "success": true, "sections": sections }))
}

fn handle_register_region(
    params: &Value,
    state: &mut EffectsState,
    commands: &mut EffectsCommands,
) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct RegisterRegionParams {
        region: String,
        rect: RegionRect,
        #[serde(default)]
        reveal: RevealOptions,
    }

    let registration = parse_params::<RegisterRegionParams>(params)?;
    let config = registration.reveal.resolve(&state.config.reveal).sanitized();

    commands.regions.write(RegionLifecycleEvent::Register {
        region: registration.region.clone(),
        rect: registration.rect,
        config,
    });

    Ok(json!({
        "success": true,
        "region": registration.region,
        "direction": config.direction.as_str(),
        "delay": config.delay
    }))
}

/// Register each item with a delay proportional to its position in the group.
fn handle_register_staggered_group(
    params: &Value,
    state: &mut EffectsState,
    commands: &mut EffectsCommands,
) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct GroupItem {
        region: String,
        rect: RegionRect,
    }

    #[derive(Deserialize)]
    struct StaggeredGroupParams {
        items: Vec<GroupItem>,
        #[serde(default, deserialize_with = "lenient_direction")]
        direction: Option<RevealDirection>,
        #[serde(default, deserialize_with = "lenient_seconds")]
        stagger: Option<f32>,
    }

    let group = parse_params::<StaggeredGroupParams>(params)?;
    let base = state.config.reveal;
    let stagger = StaggerConfig::new(
        group.direction.unwrap_or(base.direction),
        group.stagger.unwrap_or(state.config.stagger_secs),
    );

    let mut delays = Vec::with_capacity(group.items.len());
    for (index, item) in group.items.into_iter().enumerate() {
        let config = stagger.item_config(index, &base);
        delays.push(config.delay);
        commands.regions.write(RegionLifecycleEvent::Register {
            region: item.region,
            rect: item.rect,
            config,
        });
    }

    Ok(json!({ "success": true, "delays": delays }))
}

fn handle_unregister_region(params: &Value, commands: &mut EffectsCommands) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct UnregisterRegionParams {
        region: String,
    }

    let unregister = parse_params::<UnregisterRegionParams>(params)?;
    commands.regions.write(RegionLifecycleEvent::Unregister {
        region: unregister.region,
    });
    Ok(json!({ "success": true }))
}

/// Visibility ratios measured by the host's native observer.
fn handle_intersection_entries(params: &Value, commands: &mut EffectsCommands) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct IntersectionEntry {
        region: String,
        ratio: f32,
    }

    #[derive(Deserialize)]
    struct IntersectionEntriesParams {
        entries: Vec<IntersectionEntry>,
    }

    let reports = parse_params::<IntersectionEntriesParams>(params)?;
    let count = reports.entries.len();
    commands
        .intersections
        .write_batch(reports.entries.into_iter().map(|entry| IntersectionReportEvent {
            region: entry.region,
            ratio: if entry.ratio.is_finite() { entry.ratio.clamp(0.0, 1.0) } else { 0.0 },
        }));
    Ok(json!({ "success": true, "entries": count }))
}

/// Navigation to a section missing from the document is a no-op, not an error.
fn handle_navigate_to_section(
    params: &Value,
    state: &mut EffectsState,
    commands: &mut EffectsCommands,
) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct NavigateParams {
        section: String,
    }

    let navigate = parse_params::<NavigateParams>(params)?;
    let target = SectionId::from_string(&navigate.section)
        .filter(|section| state.layout.contains_section(*section));

    let Some(section) = target else {
        debug!("Navigation target '{}' not in document", navigate.section);
        return Ok(json!({ "success": false, "section": navigate.section }));
    };

    commands.navigate.write(NavigateToSectionEvent { section });
    Ok(json!({ "success": true, "section": section.as_str() }))
}

/// Router signal. Leaving the portfolio detaches section tracking.
///
/// The listener flips right away so later messages in the same batch see the
/// new page; the state transition follows at the next frame boundary.
fn handle_set_display_mode(params: &Value, state: &mut EffectsState) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct DisplayModeParams {
        mode: String,
    }

    let mode_params = parse_params::<DisplayModeParams>(params)?;
    let mode = DisplayMode::from_string(&mode_params.mode)
        .ok_or_else(|| EffectsError::UnknownDisplayMode(mode_params.mode.clone()))?;

    let current = *state.display_mode.get();
    let requested = match *state.next_display_mode {
        NextState::Pending(pending) => pending,
        NextState::Unchanged => current,
    };

    if requested != mode {
        if mode == current {
            state.next_display_mode.reset();
        } else {
            state.next_display_mode.set(mode);
        }
        info!("Display mode -> {}", mode.as_str());
    }

    match mode {
        DisplayMode::Portfolio => state.locator.attach_listener(),
        DisplayMode::Admin => state.locator.detach_listener(),
    }

    Ok(json!({ "success": true, "mode": mode.as_str() }))
}

fn handle_set_theme(
    params: &Value,
    state: &mut EffectsState,
    rpc_interface: &mut WebRpcInterface,
) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct ThemeParams {
        theme: String,
    }

    let theme_params = parse_params::<ThemeParams>(params)?;
    let theme = Theme::from_string(&theme_params.theme)
        .ok_or_else(|| EffectsError::UnknownTheme(theme_params.theme.clone()))?;

    if state.theme.set(theme) {
        notify_theme_changed(rpc_interface, theme);
    }
    Ok(json!({ "theme": theme.as_str() }))
}

fn handle_toggle_theme(
    state: &mut EffectsState,
    rpc_interface: &mut WebRpcInterface,
) -> error::Result<Value> {
    let theme = state.theme.toggle();
    notify_theme_changed(rpc_interface, theme);
    Ok(json!({ "theme": theme.as_str() }))
}

// Explicit user choices are persisted by the host.
fn notify_theme_changed(rpc_interface: &mut WebRpcInterface, theme: Theme) {
    rpc_interface.send_notification(
        "theme_changed",
        json!({ "theme": theme.as_str(), "persist": true }),
    );
}

fn handle_set_particle_field_active(params: &Value, state: &mut EffectsState) -> error::Result<Value> {
    #[derive(Deserialize)]
    struct ParticleFieldParams {
        active: bool,
    }

    let field_params = parse_params::<ParticleFieldParams>(params)?;
    state.particles.set_enabled(field_params.active);
    Ok(json!({ "success": true, "active": field_params.active }))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(state: &EffectsState) -> error::Result<Value> {
    let fps = current_fps(state.diagnostics.as_deref()).unwrap_or(0.0);
    Ok(json!({ "fps": fps }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_params_read_as_empty_object() {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Empty {
            flag: bool,
        }

        let parsed = parse_params::<Empty>(&Value::Null).unwrap();
        assert!(!parsed.flag);
    }

    #[test]
    fn test_missing_required_field_is_invalid_params() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Required {
            section: String,
        }

        let error = parse_params::<Required>(&json!({})).unwrap_err();
        assert!(matches!(error, EffectsError::InvalidParams(_)));
    }

    #[test]
    fn test_viewport_params_clamp_negative_size() {
        let viewport: ViewportParams =
            serde_json::from_value(json!({ "scroll_y": 40, "width": -5, "height": 600 })).unwrap();
        assert_eq!(viewport.rect(), RegionRect::new(0.0, 40.0, 0.0, 600.0));
    }
}
