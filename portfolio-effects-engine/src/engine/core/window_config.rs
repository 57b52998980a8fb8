use bevy::prelude::*;
use bevy::window::PresentMode;
use constants::render_settings::CANVAS_SELECTOR;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        // Page scrolling and clicks must reach the document underneath.
        Window {
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            transparent: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: format!("Portfolio effects ({CANVAS_SELECTOR})"),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
