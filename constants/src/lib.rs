//! Shared defaults for the portfolio effects engine.
//!
//! Every value here is the fallback used when the effects configuration
//! omits a field or supplies an invalid one.

pub mod particles;
pub mod render_settings;
pub mod reveal;
pub mod sections;
pub mod timing;
