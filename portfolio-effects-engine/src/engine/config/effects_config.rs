use bevy::prelude::*;
use constants::reveal::DEFAULT_STAGGER_SECS;
use constants::timing::{FPS_NOTIFICATION_INTERVAL_SECS, LOADING_SCREEN_SECS};
use serde::{Deserialize, Serialize};

use crate::engine::config::non_negative_or;
use crate::engine::particles::field::ParticleFieldConfig;
use crate::engine::reveal::intersection::IntersectionConfig;
use crate::engine::reveal::options::RevealConfig;
use crate::engine::sections::locator::SectionTrackingConfig;

/// Complete effect configuration as a Bevy asset. Mirrors the JSON structure.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, PartialEq, TypePath, Resource)]
#[serde(default)]
pub struct EffectsConfig {
    /// Defaults for regions registered without explicit reveal options.
    pub reveal: RevealConfig,
    /// Default per-item delay of staggered groups.
    pub stagger_secs: f32,
    pub intersection: IntersectionConfig,
    pub particles: ParticleFieldConfig,
    pub sections: SectionTrackingConfig,
    pub loading_screen_secs: f32,
    pub fps_notification_interval_secs: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            stagger_secs: DEFAULT_STAGGER_SECS,
            intersection: IntersectionConfig::default(),
            particles: ParticleFieldConfig::default(),
            sections: SectionTrackingConfig::default(),
            loading_screen_secs: LOADING_SCREEN_SECS,
            fps_notification_interval_secs: FPS_NOTIFICATION_INTERVAL_SECS,
        }
    }
}

impl EffectsConfig {
    /// Replace out-of-range values with defaults, warning about each section touched.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let sanitized = Self {
            reveal: self.reveal.sanitized(),
            stagger_secs: non_negative_or(self.stagger_secs, defaults.stagger_secs),
            intersection: self.intersection.sanitized(),
            particles: self.particles.clone().sanitized(),
            sections: SectionTrackingConfig {
                probe_offset: finite_or(self.sections.probe_offset, defaults.sections.probe_offset),
                header_scrolled_threshold: finite_or(
                    self.sections.header_scrolled_threshold,
                    defaults.sections.header_scrolled_threshold,
                ),
            },
            loading_screen_secs: non_negative_or(
                self.loading_screen_secs,
                defaults.loading_screen_secs,
            ),
            fps_notification_interval_secs: non_negative_or(
                self.fps_notification_interval_secs,
                defaults.fps_notification_interval_secs,
            ),
        };

        if sanitized != self {
            warn!("Effects config contained invalid values; defaults substituted");
        }
        sanitized
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reveal::options::RevealDirection;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config: EffectsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EffectsConfig::default());
    }

    #[test]
    fn test_partial_json_overrides_only_given_fields() {
        let config: EffectsConfig = serde_json::from_str(
            r#"{
                "reveal": { "direction": "left", "duration": 1.2 },
                "particles": { "count": 80, "seed": 12 },
                "sections": { "probe_offset": 64 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.reveal.direction, RevealDirection::Left);
        assert_eq!(config.reveal.duration, 1.2);
        assert_eq!(config.reveal.distance, 30.0);
        assert_eq!(config.particles.count, 80);
        assert_eq!(config.particles.seed, Some(12));
        assert_eq!(config.particles.tick_interval_ms, 50);
        assert_eq!(config.sections.probe_offset, 64.0);
        assert_eq!(config.sections.header_scrolled_threshold, 20.0);
    }

    #[test]
    fn test_sanitized_restores_invalid_values() {
        let config = EffectsConfig {
            stagger_secs: -1.0,
            loading_screen_secs: f32::INFINITY,
            ..default()
        }
        .sanitized();

        assert_eq!(config, EffectsConfig::default());
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let bundled: EffectsConfig =
            serde_json::from_str(include_str!("../../../assets/effects_config.json")).unwrap();
        assert_eq!(bundled, EffectsConfig::default());
    }
}
