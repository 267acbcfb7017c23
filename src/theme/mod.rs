//! Light/dark theme preference.
//!
//! The preference is read once at startup (default [`Theme::Light`]) and
//! written back synchronously on every change. Storage problems never
//! surface to the user: reads fall back to the default and failed writes are
//! logged.

pub mod store;

use std::fmt;

pub use store::{FileStore, MemoryStore, PreferenceStore};

/// Storage key holding the persisted theme.
pub const THEME_KEY: &str = "theme";

/// Display theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The literal persisted under [`THEME_KEY`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a persisted value. Anything unknown is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the current theme and the store it is persisted to.
pub struct ThemeManager {
    current: Theme,
    store: Box<dyn PreferenceStore + Send>,
}

impl ThemeManager {
    /// Restore the persisted theme from `store`, defaulting to light.
    pub fn load(store: Box<dyn PreferenceStore + Send>) -> Self {
        let current = match store.get(THEME_KEY) {
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown persisted theme, using light");
                Theme::Light
            }),
            None => Theme::Light,
        };
        tracing::debug!(theme = %current, "theme restored");
        Self { current, store }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip between light and dark and persist the result.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled())
    }

    /// Switch to `theme` and persist it.
    pub fn set(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            tracing::warn!(error = %e, "could not persist theme preference");
        }
        theme
    }
}

impl fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeManager")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
