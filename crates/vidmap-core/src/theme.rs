//! Dark-mode preference persisted through an injected store.

use std::collections::HashMap;

/// Storage key of the dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkModeEnabled";

/// Key-value storage for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory [`PreferenceStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Color theme of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Icon shown on the toggle button.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "☀️",
            Self::Dark => "🌙",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Current theme bound to the store it is persisted in.
#[derive(Debug)]
pub struct ThemeToggle<S> {
    store: S,
    theme: Theme,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    /// Restore the theme on page load.
    ///
    /// A saved `"true"` means dark. With nothing saved, the system
    /// preference decides. Any other saved value means light.
    pub fn load(store: S, prefers_dark: bool) -> Self {
        let theme = match store.get(DARK_MODE_KEY).as_deref() {
            Some("true") => Theme::Dark,
            None if prefers_dark => Theme::Dark,
            _ => Theme::Light,
        };
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip the theme and persist the new choice.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.flipped();
        self.store
            .set(DARK_MODE_KEY, self.theme.is_dark().to_string());
        self.theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
