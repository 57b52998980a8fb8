use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Convert string identifier to a theme for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Page-wide light/dark flag shared with every consumer as a resource.
#[derive(Resource, Debug, Default)]
pub struct ThemeContext {
    theme: Theme,
    initialised: bool,
}

impl ThemeContext {
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Bootstrap from the host's stored preference, falling back to the
    /// system colour scheme when nothing is stored. Only the first call applies.
    pub fn initialise(&mut self, stored: Option<&str>, prefers_dark: bool) -> Option<Theme> {
        if self.initialised {
            return None;
        }
        self.initialised = true;

        let dark = match stored {
            Some(stored) => stored == "dark",
            None => prefers_dark,
        };
        self.theme = if dark { Theme::Dark } else { Theme::Light };
        Some(self.theme)
    }

    /// Returns true if the theme changed.
    pub fn set(&mut self, theme: Theme) -> bool {
        self.initialised = true;
        if self.theme == theme {
            return false;
        }
        self.theme = theme;
        true
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some("dark"), false, Theme::Dark ; "stored dark wins")]
    #[test_case(Some("light"), true, Theme::Light ; "stored light wins")]
    #[test_case(None, true, Theme::Dark ; "system dark")]
    #[test_case(None, false, Theme::Light ; "system light")]
    #[test_case(Some("sepia"), true, Theme::Light ; "unrecognised stored value")]
    fn test_initial_theme(stored: Option<&str>, prefers_dark: bool, expected: Theme) {
        let mut context = ThemeContext::default();
        assert_eq!(context.initialise(stored, prefers_dark), Some(expected));
        assert_eq!(context.theme(), expected);
    }

    #[test]
    fn test_initialises_once() {
        let mut context = ThemeContext::default();
        context.initialise(None, false);
        assert_eq!(context.initialise(Some("dark"), true), None);
        assert_eq!(context.theme(), Theme::Light);
    }

    #[test]
    fn test_toggle_and_set() {
        let mut context = ThemeContext::default();
        assert_eq!(context.toggle(), Theme::Light);
        assert_eq!(context.toggle(), Theme::Dark);
        assert!(!context.set(Theme::Dark));
        assert!(context.set(Theme::Light));
        assert_eq!(Theme::from_string("DARK"), Some(Theme::Dark));
    }
}
