//! Error handling for host-supplied effect commands.

use thiserror::Error;

/// Errors raised while decoding or applying a command from the host page.
///
/// None of these are fatal: the RPC layer turns them into JSON-RPC error
/// responses and the engine keeps running with its previous state.
#[derive(Debug, Error)]
pub enum EffectsError {
    /// Parameters did not match the shape the method expects
    #[error("Invalid params: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// Section identifier outside the fixed section set
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Display mode other than portfolio or admin
    #[error("Unknown display mode: {0}")]
    UnknownDisplayMode(String),

    /// Theme other than light or dark
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}

/// Type alias for results of effect command handlers
pub type Result<T> = std::result::Result<T, EffectsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EffectsError::UnknownSection("blog".to_string());
        assert_eq!(format!("{}", error), "Unknown section: blog");

        let error = EffectsError::UnknownDisplayMode("kiosk".to_string());
        assert_eq!(format!("{}", error), "Unknown display mode: kiosk");
    }

    #[test]
    fn test_invalid_params_from_serde() {
        let serde_error = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let error = EffectsError::from(serde_error);
        assert!(format!("{}", error).starts_with("Invalid params:"));
    }
}
