use constants::reveal::DEFAULT_STAGGER_SECS;

use crate::engine::config::non_negative_or;
use crate::engine::reveal::options::{RevealConfig, RevealDirection};

/// Shared settings of a staggered group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerConfig {
    pub direction: RevealDirection,
    /// Delay added per item position, in seconds.
    pub stagger: f32,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            direction: RevealDirection::Up,
            stagger: DEFAULT_STAGGER_SECS,
        }
    }
}

impl StaggerConfig {
    pub fn new(direction: RevealDirection, stagger: f32) -> Self {
        Self {
            direction,
            stagger: non_negative_or(stagger, DEFAULT_STAGGER_SECS),
        }
    }

    /// Reveal settings for the item at `index`: delay grows by one stagger step per position.
    pub fn item_config(&self, index: usize, base: &RevealConfig) -> RevealConfig {
        base.with_direction(self.direction)
            .with_delay(index as f32 * self.stagger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn group(stagger: &StaggerConfig, count: usize, base: &RevealConfig) -> Vec<RevealConfig> {
        (0..count).map(|index| stagger.item_config(index, base)).collect()
    }

    #[test_case(0 ; "empty group")]
    #[test_case(1 ; "single item")]
    #[test_case(6 ; "six items")]
    #[test_case(40 ; "long grid")]
    fn test_item_delay_is_index_times_stagger(count: usize) {
        let stagger = StaggerConfig::new(RevealDirection::Left, 0.1);
        let configs = group(&stagger, count, &RevealConfig::default());

        assert_eq!(configs.len(), count);
        for (index, config) in configs.iter().enumerate() {
            assert_eq!(config.delay, index as f32 * 0.1);
            assert_eq!(config.direction, RevealDirection::Left);
            assert_eq!(config.duration, 0.6);
            assert_eq!(config.distance, 30.0);
        }
    }

    #[test]
    fn test_delay_does_not_depend_on_group_size() {
        let stagger = StaggerConfig::default();
        let base = RevealConfig::default();

        let small = group(&stagger, 3, &base);
        let large = group(&stagger, 30, &base);
        assert_eq!(small[..], large[..3]);
    }

    #[test]
    fn test_invalid_stagger_uses_default() {
        assert_eq!(StaggerConfig::new(RevealDirection::Up, -0.5).stagger, 0.1);
        assert_eq!(StaggerConfig::new(RevealDirection::Up, f32::NAN).stagger, 0.1);
        assert_eq!(StaggerConfig::new(RevealDirection::Up, 0.0).stagger, 0.0);
    }
}
