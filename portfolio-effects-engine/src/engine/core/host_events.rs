use bevy::prelude::*;

/// Page scroll offset reported by the host, in CSS pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub scroll_x: f32,
    pub scroll_y: f32,
    /// Whether the portfolio page was showing when the host scrolled.
    /// Section and header listeners ignore scrolling on other pages.
    pub portfolio: bool,
}
