pub mod config;
pub mod core;
pub mod error;
pub mod particles;
pub mod reveal;
pub mod sections;
pub mod systems;
pub mod theme;
