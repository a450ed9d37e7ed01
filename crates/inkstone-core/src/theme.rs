//! Theme catalog
//!
//! The shell only needs to know which themes exist and whether each one
//! is dark; stylesheet contents belong to the UI layer.

use inkstone_session::DEFAULT_THEME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Stable key stored in the session file
    pub key: &'static str,
    /// Human-readable name for menus
    pub name: &'static str,
    pub is_dark: bool,
}

pub const THEMES: [Theme; 5] = [
    Theme {
        key: "nord",
        name: "Nord",
        is_dark: true,
    },
    Theme {
        key: "catppuccin",
        name: "Catppuccin Mocha",
        is_dark: true,
    },
    Theme {
        key: "paper",
        name: "White",
        is_dark: false,
    },
    Theme {
        key: "github_primer",
        name: "Black",
        is_dark: true,
    },
    Theme {
        key: "dark",
        name: "Dark",
        is_dark: true,
    },
];

/// Look up a theme by key, falling back to the default for unknown or
/// stale preferences rather than failing.
pub fn theme_or_default(key: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.key == key)
        .or_else(|| THEMES.iter().find(|theme| theme.key == DEFAULT_THEME))
        .unwrap_or(&THEMES[0])
}
