/// Delay before a reveal transition starts once its region is visible (seconds)
pub const DEFAULT_REVEAL_DELAY_SECS: f32 = 0.0;

/// Length of the reveal transition (seconds)
pub const DEFAULT_REVEAL_DURATION_SECS: f32 = 0.6;

/// Distance the content travels while fading in (pixels)
pub const DEFAULT_REVEAL_DISTANCE_PX: f32 = 30.0;

/// Per-item delay increment for staggered groups (seconds)
pub const DEFAULT_STAGGER_SECS: f32 = 0.1;

/// Cubic-bezier control points (x1, y1, x2, y2) for the reveal curve.
pub const REVEAL_EASE_CONTROL_POINTS: [f32; 4] = [0.25, 0.46, 0.45, 0.94];

/// Fraction of a region's area that must be inside the root before it counts as visible
pub const INTERSECTION_THRESHOLD: f32 = 0.1;

/// Extra pixels below the viewport that count as "inside" so reveals start early
pub const INTERSECTION_ROOT_MARGIN_BOTTOM_PX: f32 = 50.0;
