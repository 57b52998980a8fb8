//! Scroll-driven reveal, section tracking and ambient particle effects for a
//! single-page portfolio, driven by the host page over JSON-RPC.

pub mod engine;
pub mod rpc;

pub use engine::core::app_setup::{EffectsPlugin, EffectsSet, create_app};
