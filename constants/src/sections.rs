/// Offset added to the scroll position before locating the active section (pixels)
pub const SECTION_PROBE_OFFSET_PX: f32 = 100.0;

/// Scroll distance after which the header switches to its condensed style (pixels)
pub const HEADER_SCROLLED_THRESHOLD_PX: f32 = 20.0;
