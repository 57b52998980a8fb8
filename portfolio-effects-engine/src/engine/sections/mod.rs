//! Active-section tracking for page navigation.
//!
//! The host reports where each section element sits in the document; every
//! scroll offset is shifted by a probe offset and matched against those
//! bounds in declaration order. Navigation sets the active section before
//! the smooth scroll it requests has finished.

pub mod header;
pub mod layout;
pub mod locator;
pub mod section_id;
