use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::sections::section_id::SectionId;

/// Vertical extent of a section element in document pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub top: f32,
    pub height: f32,
}

impl SectionBounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    /// Half-open containment: `[top, top + height)`.
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Section element positions as last reported by the host.
/// Sections missing from the document have no entry.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SectionLayout {
    bounds: [Option<SectionBounds>; SectionId::COUNT],
}

impl SectionLayout {
    pub fn from_entries(entries: impl IntoIterator<Item = (SectionId, SectionBounds)>) -> Self {
        let mut layout = Self::default();
        for (section, bounds) in entries {
            layout.set(section, bounds);
        }
        layout
    }

    pub fn get(&self, section: SectionId) -> Option<SectionBounds> {
        self.bounds[section.index()]
    }

    pub fn set(&mut self, section: SectionId, bounds: SectionBounds) {
        self.bounds[section.index()] = Some(bounds);
    }

    pub fn contains_section(&self, section: SectionId) -> bool {
        self.get(section).is_some()
    }

    /// First section in declaration order whose range holds `probe`.
    pub fn locate(&self, probe: f32) -> Option<SectionId> {
        SectionId::ALL
            .into_iter()
            .find(|section| self.get(*section).is_some_and(|bounds| bounds.contains(probe)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_half_open() {
        let bounds = SectionBounds::new(800.0, 800.0);
        assert!(bounds.contains(800.0));
        assert!(bounds.contains(1599.9));
        assert!(!bounds.contains(1600.0));
        assert!(!bounds.contains(799.9));
    }

    #[test]
    fn test_overlap_resolves_to_first_declared() {
        let layout = SectionLayout::from_entries([
            (SectionId::About, SectionBounds::new(0.0, 1000.0)),
            (SectionId::Projects, SectionBounds::new(500.0, 1000.0)),
        ]);
        assert_eq!(layout.locate(700.0), Some(SectionId::About));
        assert_eq!(layout.locate(1200.0), Some(SectionId::Projects));
    }

    #[test]
    fn test_missing_sections_are_skipped() {
        let layout = SectionLayout::from_entries([(SectionId::Contact, SectionBounds::new(0.0, 500.0))]);
        assert!(!layout.contains_section(SectionId::Home));
        assert_eq!(layout.locate(100.0), Some(SectionId::Contact));
        assert_eq!(layout.locate(600.0), None);
    }

    #[test]
    fn test_empty_layout_locates_nothing() {
        assert_eq!(SectionLayout::default().locate(0.0), None);
    }
}
