use serde::{Deserialize, Serialize};

/// Named page regions in document order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    #[default]
    Home,
    About,
    Projects,
    Contact,
}

impl SectionId {
    pub const COUNT: usize = 4;

    /// Declaration order; also the scan order of the locator.
    pub const ALL: [SectionId; Self::COUNT] = [Self::Home, Self::About, Self::Projects, Self::Contact];

    /// Convert string identifier to a section for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "about" => Some(Self::About),
            "projects" => Some(Self::Projects),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    /// Element id of the section in the host document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Contact => "contact",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}
