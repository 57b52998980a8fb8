//! Ambient particle field drifting behind the page.
//!
//! A fixed set of particles is spawned over the viewport size known at
//! activation and moved by a repeating timer, wrapping at the edges.

pub mod field;
pub mod render;
