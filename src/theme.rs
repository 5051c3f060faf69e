use crate::storage::KeyValueStore;
use std::fmt;
use std::str::FromStr;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Reads the stored preference. Missing or unknown values mean light.
    pub fn load(store: &impl KeyValueStore) -> Self {
        store
            .get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn persist(self, store: &impl KeyValueStore) -> bool {
        store.set(THEME_KEY, self.as_str())
    }

    /// Flips the theme and stores the new value.
    pub fn toggle(self, store: &impl KeyValueStore) -> Self {
        let next = self.toggled();
        if !next.persist(store) {
            log::warn!("theme: could not persist preference `{}`", next);
        }
        next
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_light() {
        let store = MemoryStore::new();
        assert_eq!(Theme::load(&store), Theme::Light);
        store.set(THEME_KEY, "sepia");
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn toggle_persists_and_reloads() {
        let store = MemoryStore::new();
        let theme = Theme::load(&store).toggle(&store);
        assert_eq!(theme, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store), Theme::Dark);

        let theme = theme.toggle(&store);
        assert_eq!(Theme::load(&store), theme);
        assert_eq!(theme, Theme::Light);
    }
}
