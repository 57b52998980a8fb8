use bevy::prelude::*;
use constants::reveal::{INTERSECTION_ROOT_MARGIN_BOTTOM_PX, INTERSECTION_THRESHOLD};
use serde::{Deserialize, Serialize};

use crate::engine::core::host_events::ScrollEvent;
use crate::engine::reveal::animator::{RegionEnteredEvent, RegionIndex, RevealRegion};

/// Axis-aligned rectangle in document pixels (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl RegionRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Grow each side outward by the matching margin.
    pub fn expanded(&self, margin: &RootMargin) -> Self {
        Self {
            left: self.left - margin.left,
            top: self.top - margin.top,
            width: self.width + margin.left + margin.right,
            height: self.height + margin.top + margin.bottom,
        }
    }

    pub fn intersection_area(&self, other: &RegionRect) -> f32 {
        let width = self.right().min(other.right()) - self.left.max(other.left);
        let height = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        width * height
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Pixels added around the viewport before testing intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: INTERSECTION_ROOT_MARGIN_BOTTOM_PX,
            left: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionConfig {
    /// Fraction of the region's area that must lie inside the root.
    pub threshold: f32,
    pub root_margin: RootMargin,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            threshold: INTERSECTION_THRESHOLD,
            root_margin: RootMargin::default(),
        }
    }
}

impl IntersectionConfig {
    /// Clamp the threshold into `[0, 1]` and drop non-finite margins.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let threshold = if self.threshold.is_finite() {
            self.threshold.clamp(0.0, 1.0)
        } else {
            defaults.threshold
        };
        let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        Self {
            threshold,
            root_margin: RootMargin {
                top: finite_or(self.root_margin.top, defaults.root_margin.top),
                right: finite_or(self.root_margin.right, defaults.root_margin.right),
                bottom: finite_or(self.root_margin.bottom, defaults.root_margin.bottom),
                left: finite_or(self.root_margin.left, defaults.root_margin.left),
            },
        }
    }

    /// A ratio counts once it reaches the threshold and the region actually overlaps.
    pub fn is_satisfied_by(&self, ratio: f32) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Share of `region` covered by `root`, in `[0, 1]`.
///
/// Degenerate regions have no area to share, so they count as fully
/// visible when their origin sits inside the root and invisible otherwise.
pub fn intersection_ratio(region: &RegionRect, root: &RegionRect) -> f32 {
    let area = region.area();
    if area <= 0.0 {
        return if root.contains_point(region.left, region.top) {
            1.0
        } else {
            0.0
        };
    }
    (region.intersection_area(root) / area).clamp(0.0, 1.0)
}

/// Last viewport reported by the host, in document pixels.
#[derive(Resource, Debug, Default)]
pub struct ViewportState {
    rect: Option<RegionRect>,
}

impl ViewportState {
    pub fn rect(&self) -> Option<RegionRect> {
        self.rect
    }

    pub fn size(&self) -> Option<Vec2> {
        self.rect.map(|rect| Vec2::new(rect.width, rect.height))
    }

    pub fn set(&mut self, rect: RegionRect) {
        self.rect = Some(rect);
    }

    /// Move the known viewport. Ignored until a size has been reported.
    pub fn scroll_to(&mut self, scroll_x: f32, scroll_y: f32) {
        if let Some(rect) = self.rect.as_mut() {
            rect.left = scroll_x;
            rect.top = scroll_y;
        }
    }
}

/// Whether the host can observe visibility at all.
#[derive(Resource, Debug)]
pub struct ObservationSupport {
    pub available: bool,
}

impl Default for ObservationSupport {
    fn default() -> Self {
        Self { available: true }
    }
}

/// Armed visibility watch on a region. Removed as soon as it fires.
#[derive(Component, Debug, Clone)]
pub struct IntersectionTracker {
    pub rect: RegionRect,
    pub config: IntersectionConfig,
}

impl IntersectionTracker {
    pub fn new(rect: RegionRect, config: IntersectionConfig) -> Self {
        Self { rect, config }
    }

    pub fn ratio_in(&self, viewport: &RegionRect) -> f32 {
        let root = viewport.expanded(&self.config.root_margin);
        intersection_ratio(&self.rect, &root)
    }

    pub fn is_visible_in(&self, viewport: &RegionRect) -> bool {
        self.config.is_satisfied_by(self.ratio_in(viewport))
    }
}

/// Visibility ratio measured by the host's own observer.
#[derive(Event, Debug, Clone)]
pub struct IntersectionReportEvent {
    pub region: String,
    pub ratio: f32,
}

/// Keep the viewport origin in step with page scrolling.
pub fn apply_scroll_to_viewport(
    mut scroll_events: EventReader<ScrollEvent>,
    mut viewport: ResMut<ViewportState>,
) {
    let Some(latest) = scroll_events.read().last().copied() else {
        return;
    };

    let moved = viewport
        .rect()
        .is_some_and(|rect| rect.left != latest.scroll_x || rect.top != latest.scroll_y);
    if moved {
        viewport.scroll_to(latest.scroll_x, latest.scroll_y);
    }
}

/// Fire trackers whose region crossed the threshold.
///
/// Runs only for newly armed or re-measured trackers, or after the viewport
/// moved, so an idle page costs nothing. Without observation support every
/// armed tracker fires at once and the region is shown without animation.
pub fn evaluate_intersection_trackers(
    mut commands: Commands,
    viewport: Res<ViewportState>,
    observation: Res<ObservationSupport>,
    trackers: Query<(Entity, Ref<IntersectionTracker>, &RevealRegion)>,
    mut entered: EventWriter<RegionEnteredEvent>,
) {
    if !observation.available {
        for (entity, _, region) in &trackers {
            debug!("Observation unavailable, revealing '{}' immediately", region.id);
            commands.entity(entity).remove::<IntersectionTracker>();
            entered.write(RegionEnteredEvent {
                entity,
                immediate: true,
            });
        }
        return;
    }

    let Some(viewport_rect) = viewport.rect() else {
        return;
    };
    let viewport_moved = viewport.is_changed();

    for (entity, tracker, region) in &trackers {
        if !viewport_moved && !tracker.is_changed() {
            continue;
        }

        if tracker.is_visible_in(&viewport_rect) {
            debug!("Region '{}' entered the viewport", region.id);
            commands.entity(entity).remove::<IntersectionTracker>();
            entered.write(RegionEnteredEvent {
                entity,
                immediate: false,
            });
        }
    }
}

/// Apply visibility ratios measured by the host's native observer.
///
/// Reports for unknown regions or regions that already fired are ignored.
pub fn apply_intersection_reports(
    mut commands: Commands,
    mut reports: EventReader<IntersectionReportEvent>,
    index: Res<RegionIndex>,
    trackers: Query<&IntersectionTracker>,
    mut entered: EventWriter<RegionEnteredEvent>,
) {
    for report in reports.read() {
        let Some(entity) = index.get(&report.region) else {
            debug!("Intersection report for unknown region '{}'", report.region);
            continue;
        };
        let Ok(tracker) = trackers.get(entity) else {
            continue;
        };

        if tracker.config.is_satisfied_by(report.ratio) {
            debug!(
                "Region '{}' entered via host observer (ratio {:.2})",
                report.region, report.ratio
            );
            commands.entity(entity).remove::<IntersectionTracker>();
            entered.write(RegionEnteredEvent {
                entity,
                immediate: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> RegionRect {
        RegionRect::new(0.0, 0.0, 1280.0, 800.0)
    }

    #[test]
    fn test_ratio_fully_inside() {
        let region = RegionRect::new(100.0, 100.0, 200.0, 200.0);
        assert_eq!(intersection_ratio(&region, &viewport()), 1.0);
    }

    #[test]
    fn test_ratio_partially_inside() {
        // Bottom half hangs below the viewport.
        let region = RegionRect::new(0.0, 700.0, 100.0, 200.0);
        assert!((intersection_ratio(&region, &viewport()) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_outside_and_touching() {
        let below = RegionRect::new(0.0, 1000.0, 100.0, 100.0);
        assert_eq!(intersection_ratio(&below, &viewport()), 0.0);

        let touching = RegionRect::new(0.0, 800.0, 100.0, 100.0);
        assert_eq!(intersection_ratio(&touching, &viewport()), 0.0);
    }

    #[test]
    fn test_degenerate_region_uses_origin() {
        let inside = RegionRect::new(10.0, 10.0, 0.0, 0.0);
        let outside = RegionRect::new(10.0, 5000.0, 0.0, 0.0);
        assert_eq!(intersection_ratio(&inside, &viewport()), 1.0);
        assert_eq!(intersection_ratio(&outside, &viewport()), 0.0);
    }

    #[test]
    fn test_bottom_margin_reveals_early() {
        // Region starts 20px below the fold: only the 50px bottom margin covers it.
        let region = RegionRect::new(0.0, 820.0, 100.0, 100.0);
        let tracker = IntersectionTracker::new(region, IntersectionConfig::default());

        assert!((tracker.ratio_in(&viewport()) - 0.3).abs() < 1e-5);
        assert!(tracker.is_visible_in(&viewport()));

        let no_margin = IntersectionTracker::new(
            region,
            IntersectionConfig {
                threshold: 0.1,
                root_margin: RootMargin {
                    bottom: 0.0,
                    ..default()
                },
            },
        );
        assert!(!no_margin.is_visible_in(&viewport()));
    }

    #[test]
    fn test_threshold_boundary_counts() {
        let config = IntersectionConfig::default();
        assert!(config.is_satisfied_by(0.1));
        assert!(!config.is_satisfied_by(0.09));

        let zero = IntersectionConfig {
            threshold: 0.0,
            ..default()
        };
        assert!(!zero.is_satisfied_by(0.0));
        assert!(zero.is_satisfied_by(0.001));
    }

    #[test]
    fn test_scroll_ignored_before_viewport_known() {
        let mut state = ViewportState::default();
        state.scroll_to(0.0, 500.0);
        assert_eq!(state.rect(), None);

        state.set(viewport());
        state.scroll_to(0.0, 500.0);
        assert_eq!(state.rect().map(|rect| rect.top), Some(500.0));
        assert_eq!(state.size(), Some(Vec2::new(1280.0, 800.0)));
    }

    #[test]
    fn test_sanitized_clamps_threshold() {
        let config = IntersectionConfig {
            threshold: 4.0,
            root_margin: RootMargin {
                top: f32::INFINITY,
                ..default()
            },
        }
        .sanitized();
        assert_eq!(config.threshold, 1.0);
        assert_eq!(config.root_margin.top, 0.0);
        assert_eq!(config.root_margin.bottom, 50.0);
    }
}
