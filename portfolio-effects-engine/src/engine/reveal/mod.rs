//! Scroll-driven reveal system.
//!
//! Regions registered by the host are watched by an intersection tracker;
//! the first time a region is sufficiently visible its animator plays a
//! one-shot fade-and-slide transition whose frames are pushed back to the
//! host over RPC.
//!
//! ```text
//! register_region ─> IntersectionTracker ──entered──> RevealAnimator ──> reveal_frames
//!                        (removed on fire)              (never reverses)
//! ```

/// One-shot entrance transitions, region bookkeeping and frame publishing.
pub mod animator;

/// Cubic-bezier timing curve shared by all reveals.
pub mod easing;

/// Viewport intersection maths, trackers and the unsupported-observer fallback.
pub mod intersection;

/// Reveal parameters with lenient host-side parsing.
pub mod options;

/// Per-item delays for staggered groups.
pub mod stagger;
