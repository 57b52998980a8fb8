/// Minimum time the loading screen stays up before effects start (seconds)
pub const LOADING_SCREEN_SECS: f32 = 2.0;

/// Interval between FPS notifications sent to the host (seconds)
pub const FPS_NOTIFICATION_INTERVAL_SECS: f32 = 0.5;

/// Maximum number of delivered messages retained by the native outbox
pub const NATIVE_OUTBOX_CAPACITY: usize = 1024;
