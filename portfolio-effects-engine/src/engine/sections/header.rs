use bevy::prelude::*;

use crate::engine::config::effects_config::EffectsConfig;
use crate::engine::core::host_events::ScrollEvent;
use crate::rpc::web_rpc::WebRpcInterface;

/// Whether the page has scrolled far enough for the header to switch style.
#[derive(Resource, Debug, Default)]
pub struct HeaderState {
    scrolled: bool,
}

impl HeaderState {
    /// Returns the new flag when it flips.
    pub fn update(&mut self, scroll_y: f32, threshold: f32) -> Option<bool> {
        let scrolled = scroll_y > threshold;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }
}

/// The header only exists on the portfolio page, so scrolling elsewhere is ignored.
pub fn track_header_scrolled(
    mut scroll_events: EventReader<ScrollEvent>,
    config: Res<EffectsConfig>,
    mut header: ResMut<HeaderState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(last) = scroll_events.read().filter(|event| event.portfolio).last() else {
        return;
    };

    if let Some(scrolled) = header.update(last.scroll_y, config.sections.header_scrolled_threshold) {
        rpc_interface.send_notification(
            "header_scrolled_changed",
            serde_json::json!({ "scrolled": scrolled }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_flips_past_threshold() {
        let mut header = HeaderState::default();
        assert_eq!(header.update(20.0, 20.0), None);
        assert_eq!(header.update(21.0, 20.0), Some(true));
        assert_eq!(header.update(400.0, 20.0), None);
        assert_eq!(header.update(0.0, 20.0), Some(false));
        assert!(!header.scrolled);
    }
}
