//! JSON-RPC 2.0 communication layer between the host page and the effects engine.
//!
//! The engine canvas sits on top of the portfolio page; the page owns the
//! DOM and reports scrolling, layout and visibility, the engine answers
//! with reveal frames, section changes and scroll requests. Messages travel
//! over `window.postMessage`.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (DOM)                         Bevy (wasm canvas)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        ├─ Notification (no ID) ───────────────> ├─ Applied, never answered
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Adding New RPC Methods
//!
//! Add a case to `handlers::dispatch()` and a handler returning
//! `engine::error::Result<Value>`:
//!
//! ```rust,ignore
//! fn handle_your_method(params: &Value, state: &mut EffectsState) -> error::Result<Value> {
//!     #[derive(Deserialize)]
//!     struct YourParams {
//!         field: String,
//!     }
//!
//!     let parsed = parse_params::<YourParams>(params)?;
//!     Ok(json!({ "success": true, "result": parsed.field }))
//! }
//! ```
//!
//! Engine errors convert into `-32602` responses at the boundary.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! ### Page state
//! - `init`: Capabilities, initial viewport and stored theme
//! - `viewport_changed`: Viewport size and offset
//! - `scroll`: Page scroll offset
//! - `section_layout`: Section element positions
//! - `set_display_mode`: Portfolio or admin page
//!
//! ### Reveal
//! - `register_region` / `unregister_region`: Mount and unmount revealed regions
//! - `register_staggered_group`: Regions revealed one after another
//! - `intersection_entries`: Ratios from the host's own observer
//!
//! ### Navigation
//! - `navigate_to_section`: Activate a section and scroll to it
//! - `get_active_section`: Current section
//!
//! ### Appearance
//! - `set_theme` / `toggle_theme`: Light and dark theme
//! - `set_particle_field_active`: Start or stop the particle field
//!
//! ### Diagnostics
//! - `get_fps`: Retrieve current frame rate

/// Parameter decoding and per-method handlers.
pub mod handlers;

/// JSON-RPC 2.0 bidirectional communication system for host integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
