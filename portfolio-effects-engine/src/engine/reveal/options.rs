use bevy::prelude::*;
use constants::reveal::{
    DEFAULT_REVEAL_DELAY_SECS, DEFAULT_REVEAL_DISTANCE_PX, DEFAULT_REVEAL_DURATION_SECS,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::config::non_negative_or;

/// Side the content enters from. `Up` means it rises into place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl RevealDirection {
    /// Convert string identifier to a direction for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Starting offset in page pixels (x right, y down) for a hidden region.
    pub fn initial_offset(&self, distance: f32) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, distance),
            Self::Down => Vec2::new(0.0, -distance),
            Self::Left => Vec2::new(distance, 0.0),
            Self::Right => Vec2::new(-distance, 0.0),
        }
    }
}

/// Fully resolved reveal parameters for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub direction: RevealDirection,
    /// Seconds to wait after the region becomes visible.
    pub delay: f32,
    /// Seconds from hidden to fully visible.
    pub duration: f32,
    /// Pixels travelled along the direction axis.
    pub distance: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            direction: RevealDirection::Up,
            delay: DEFAULT_REVEAL_DELAY_SECS,
            duration: DEFAULT_REVEAL_DURATION_SECS,
            distance: DEFAULT_REVEAL_DISTANCE_PX,
        }
    }
}

impl RevealConfig {
    /// Replace negative or non-finite timings with their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            direction: self.direction,
            delay: non_negative_or(self.delay, defaults.delay),
            duration: non_negative_or(self.duration, defaults.duration),
            distance: non_negative_or(self.distance, defaults.distance),
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_direction(mut self, direction: RevealDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// Partially specified reveal parameters as sent by the host.
///
/// Every field is optional and lenient: unrecognised directions and
/// malformed numbers are dropped so the configured default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    #[serde(deserialize_with = "lenient_direction")]
    pub direction: Option<RevealDirection>,
    #[serde(deserialize_with = "lenient_seconds")]
    pub delay: Option<f32>,
    #[serde(deserialize_with = "lenient_seconds")]
    pub duration: Option<f32>,
    #[serde(deserialize_with = "lenient_seconds")]
    pub distance: Option<f32>,
}

impl RevealOptions {
    /// Fill unspecified fields from `defaults`.
    pub fn resolve(&self, defaults: &RevealConfig) -> RevealConfig {
        RevealConfig {
            direction: self.direction.unwrap_or(defaults.direction),
            delay: self.delay.unwrap_or(defaults.delay),
            duration: self.duration.unwrap_or(defaults.duration),
            distance: self.distance.unwrap_or(defaults.distance),
        }
    }
}

/// Accept any JSON value; only recognised direction strings survive.
pub fn lenient_direction<'de, D>(deserializer: D) -> Result<Option<RevealDirection>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let direction = value.as_str().and_then(|raw| {
        let parsed = RevealDirection::from_string(raw);
        if parsed.is_none() {
            warn!("Unrecognised reveal direction '{}', using default", raw);
        }
        parsed
    });
    Ok(direction)
}

/// Accept any JSON value; only finite, non-negative numbers survive.
pub fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .map(|number| number as f32)
        .filter(|number| number.is_finite() && *number >= 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_initial_offsets_follow_direction() {
        assert_eq!(RevealDirection::Up.initial_offset(30.0), Vec2::new(0.0, 30.0));
        assert_eq!(RevealDirection::Down.initial_offset(30.0), Vec2::new(0.0, -30.0));
        assert_eq!(RevealDirection::Left.initial_offset(30.0), Vec2::new(30.0, 0.0));
        assert_eq!(RevealDirection::Right.initial_offset(30.0), Vec2::new(-30.0, 0.0));
    }

    #[test]
    fn test_defaults_match_constants() {
        let config = RevealConfig::default();
        assert_eq!(config.direction, RevealDirection::Up);
        assert_eq!(config.delay, 0.0);
        assert_eq!(config.duration, 0.6);
        assert_eq!(config.distance, 30.0);
    }

    #[test]
    fn test_options_resolve_against_defaults() {
        let options: RevealOptions =
            serde_json::from_value(json!({ "direction": "left", "delay": 0.4 })).unwrap();
        let config = options.resolve(&RevealConfig::default());

        assert_eq!(
            config,
            RevealConfig {
                direction: RevealDirection::Left,
                delay: 0.4,
                duration: 0.6,
                distance: 30.0,
            }
        );
    }

    #[test]
    fn test_malformed_options_fall_back() {
        let options: RevealOptions = serde_json::from_value(json!({
            "direction": "diagonal",
            "delay": -1.0,
            "duration": "slow",
            "distance": null
        }))
        .unwrap();

        assert_eq!(options, RevealOptions::default());
        assert_eq!(options.resolve(&RevealConfig::default()), RevealConfig::default());
    }

    #[test]
    fn test_direction_strings_are_case_insensitive() {
        assert_eq!(RevealDirection::from_string("RIGHT"), Some(RevealDirection::Right));
        assert_eq!(RevealDirection::from_string("sideways"), None);
    }

    #[test]
    fn test_sanitized_replaces_invalid_timings() {
        let config = RevealConfig {
            direction: RevealDirection::Down,
            delay: f32::NAN,
            duration: -2.0,
            distance: 12.0,
        }
        .sanitized();

        assert_eq!(config.direction, RevealDirection::Down);
        assert_eq!(config.delay, 0.0);
        assert_eq!(config.duration, 0.6);
        assert_eq!(config.distance, 12.0);
    }
}
