use bevy::prelude::*;
use constants::sections::{HEADER_SCROLLED_THRESHOLD_PX, SECTION_PROBE_OFFSET_PX};
use serde::{Deserialize, Serialize};

use crate::engine::config::effects_config::EffectsConfig;
use crate::engine::core::host_events::ScrollEvent;
use crate::engine::sections::layout::{SectionBounds, SectionLayout};
use crate::engine::sections::section_id::SectionId;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionTrackingConfig {
    /// Pixels added to the scroll offset before locating the active section.
    pub probe_offset: f32,
    /// Scroll offset beyond which the header counts as scrolled.
    pub header_scrolled_threshold: f32,
}

impl Default for SectionTrackingConfig {
    fn default() -> Self {
        Self {
            probe_offset: SECTION_PROBE_OFFSET_PX,
            header_scrolled_threshold: HEADER_SCROLLED_THRESHOLD_PX,
        }
    }
}

/// Tracks which section currently occupies the probe line.
///
/// The active section is written only here; navigation UI reads it.
#[derive(Resource, Debug)]
pub struct SectionLocator {
    active: SectionId,
    listener_attached: bool,
}

impl Default for SectionLocator {
    fn default() -> Self {
        Self {
            active: SectionId::Home,
            listener_attached: false,
        }
    }
}

impl SectionLocator {
    pub fn active(&self) -> SectionId {
        self.active
    }

    pub fn is_listening(&self) -> bool {
        self.listener_attached
    }

    pub fn attach_listener(&mut self) {
        self.listener_attached = true;
    }

    pub fn detach_listener(&mut self) {
        self.listener_attached = false;
    }

    /// Re-evaluate for a scroll offset. Returns the new section if it changed.
    ///
    /// When the probe misses every section the previous section stays active.
    pub fn on_scroll(
        &mut self,
        scroll_y: f32,
        probe_offset: f32,
        layout: &SectionLayout,
    ) -> Option<SectionId> {
        let found = layout.locate(scroll_y + probe_offset)?;
        if found == self.active {
            return None;
        }
        self.active = found;
        Some(found)
    }

    /// Optimistically activate `target` ahead of the scroll it triggers.
    ///
    /// Returns the bounds to scroll to, or `None` when the section is not in
    /// the document, in which case nothing changes.
    pub fn navigate_to(&mut self, target: SectionId, layout: &SectionLayout) -> Option<SectionBounds> {
        let bounds = layout.get(target)?;
        self.active = target;
        Some(bounds)
    }
}

/// Request from navigation controls to bring a section into view.
#[derive(Event, Debug, Clone, Copy)]
pub struct NavigateToSectionEvent {
    pub section: SectionId,
}

pub fn attach_section_listener(mut locator: ResMut<SectionLocator>) {
    locator.attach_listener();
    info!("Section tracking attached");
}

pub fn detach_section_listener(mut locator: ResMut<SectionLocator>) {
    locator.detach_listener();
    info!("Section tracking detached");
}

/// Run the locator for each scroll that arrived while the listener was attached.
pub fn track_active_section(
    mut scroll_events: EventReader<ScrollEvent>,
    layout: Res<SectionLayout>,
    config: Res<EffectsConfig>,
    mut locator: ResMut<SectionLocator>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in scroll_events.read().filter(|event| event.portfolio) {
        if let Some(section) = locator.on_scroll(event.scroll_y, config.sections.probe_offset, &layout) {
            debug!("Active section -> {}", section.as_str());
            notify_active_section(&mut rpc_interface, section);
        }
    }
}

/// Apply navigation requests: switch immediately, then ask the host to scroll.
pub fn handle_navigate_to_section_events(
    mut events: EventReader<NavigateToSectionEvent>,
    layout: Res<SectionLayout>,
    mut locator: ResMut<SectionLocator>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let previous = locator.active();
        let Some(bounds) = locator.navigate_to(event.section, &layout) else {
            debug!(
                "Navigation to '{}' ignored: section not in document",
                event.section.as_str()
            );
            continue;
        };

        if previous != event.section {
            notify_active_section(&mut rpc_interface, event.section);
        }

        rpc_interface.send_notification(
            "scroll_to",
            serde_json::json!({
                "section": event.section.as_str(),
                "top": bounds.top,
                "behavior": "smooth"
            }),
        );
        info!("Navigating to section '{}'", event.section.as_str());
    }
}

fn notify_active_section(rpc_interface: &mut WebRpcInterface, section: SectionId) {
    rpc_interface.send_notification(
        "active_section_changed",
        serde_json::json!({ "section": section.as_str() }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn reference_layout() -> SectionLayout {
        SectionLayout::from_entries([
            (SectionId::Home, SectionBounds::new(0.0, 800.0)),
            (SectionId::About, SectionBounds::new(800.0, 800.0)),
            (SectionId::Projects, SectionBounds::new(1600.0, 800.0)),
            (SectionId::Contact, SectionBounds::new(2400.0, 800.0)),
        ])
    }

    #[test]
    fn test_starts_on_home_detached() {
        let locator = SectionLocator::default();
        assert_eq!(locator.active(), SectionId::Home);
        assert!(!locator.is_listening());
    }

    #[test_case(SectionId::Projects, 750.0, SectionId::About ; "probe in about")]
    #[test_case(SectionId::Contact, 0.0, SectionId::Home ; "top of page")]
    #[test_case(SectionId::Projects, 3150.0, SectionId::Projects ; "past last section keeps previous")]
    #[test_case(SectionId::About, 1500.0, SectionId::Projects ; "probe crosses boundary")]
    #[test_case(SectionId::About, -500.0, SectionId::About ; "before first section keeps previous")]
    fn test_scroll_resolves_section(start: SectionId, scroll_y: f32, expected: SectionId) {
        let layout = reference_layout();
        let mut locator = SectionLocator::default();
        locator.navigate_to(start, &layout);

        locator.on_scroll(scroll_y, SECTION_PROBE_OFFSET_PX, &layout);
        assert_eq!(locator.active(), expected);
    }

    #[test]
    fn test_on_scroll_reports_only_changes() {
        let layout = reference_layout();
        let mut locator = SectionLocator::default();

        assert_eq!(locator.on_scroll(0.0, 100.0, &layout), None);
        assert_eq!(locator.on_scroll(750.0, 100.0, &layout), Some(SectionId::About));
        assert_eq!(locator.on_scroll(900.0, 100.0, &layout), None);
    }

    #[test]
    fn test_active_always_in_fixed_set() {
        let layout = reference_layout();
        let mut locator = SectionLocator::default();
        let mut scroll = -1000.0;
        while scroll < 5000.0 {
            locator.on_scroll(scroll, 100.0, &layout);
            assert!(SectionId::ALL.contains(&locator.active()));
            scroll += 37.0;
        }
    }

    #[test]
    fn test_navigate_is_immediate() {
        let layout = reference_layout();
        let mut locator = SectionLocator::default();

        let bounds = locator.navigate_to(SectionId::Contact, &layout);
        assert_eq!(bounds, Some(SectionBounds::new(2400.0, 800.0)));
        assert_eq!(locator.active(), SectionId::Contact);
    }

    #[test]
    fn test_navigate_to_missing_section_is_noop() {
        let layout = SectionLayout::from_entries([(SectionId::Home, SectionBounds::new(0.0, 800.0))]);
        let mut locator = SectionLocator::default();

        assert_eq!(locator.navigate_to(SectionId::Projects, &layout), None);
        assert_eq!(locator.active(), SectionId::Home);
    }
}
