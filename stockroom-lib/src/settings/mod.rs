//! Application settings context.
//!
//! Theme, quiet mode and sidebar state are loaded once from a
//! [`LocalStore`] into a [`SettingsContext`], which the caller owns and
//! passes to whatever needs it. Every mutation is written through
//! immediately; a failed write is logged and the in-memory value stays in
//! effect.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, warn};

use crate::store::LocalStore;

/// Storage key of the colour theme.
pub const THEME_KEY: &str = "theme";
/// Storage key of the quiet (no animations) flag.
pub const QUIET_MODE_KEY: &str = "quiet-mode";
/// Storage key of the sidebar collapsed flag.
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebar-collapsed";
/// Storage key of the per-group sidebar state.
pub const SIDEBAR_GROUPS_KEY: &str = "sidebar-groups";

/// Collapsible sidebar groups. The core group is always expanded.
pub const SIDEBAR_GROUPS: [&str; 6] = [
    "masters",
    "operations",
    "controls",
    "planning",
    "tools",
    "settings",
];

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Snapshot of all application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub theme: Theme,
    pub quiet_mode: bool,
    pub sidebar_collapsed: bool,
    /// Sidebar group key to collapsed flag. Absent groups are expanded.
    pub sidebar_groups: BTreeMap<String, bool>,
}

impl AppSettings {
    /// Whether a sidebar group is collapsed.
    pub fn is_group_collapsed(&self, group: &str) -> bool {
        self.sidebar_groups.get(group).copied().unwrap_or(false)
    }
}

/// Settings loaded from, and written through to, a local store.
#[derive(Clone)]
pub struct SettingsContext {
    store: Arc<dyn LocalStore>,
    settings: AppSettings,
}

impl SettingsContext {
    /// Load settings, using defaults for anything missing or unreadable.
    pub async fn load(store: Arc<dyn LocalStore>) -> Self {
        let mut settings = AppSettings::default();

        if let Some(raw) = read(store.as_ref(), THEME_KEY).await {
            match raw.parse() {
                Ok(theme) => settings.theme = theme,
                Err(e) => debug!("ignoring stored theme: {}", e),
            }
        }
        if let Some(raw) = read(store.as_ref(), QUIET_MODE_KEY).await {
            settings.quiet_mode = raw == "1";
        }
        if let Some(raw) = read(store.as_ref(), SIDEBAR_COLLAPSED_KEY).await {
            settings.sidebar_collapsed = raw == "true";
        }
        if let Some(raw) = read(store.as_ref(), SIDEBAR_GROUPS_KEY).await {
            match serde_json::from_str(&raw) {
                Ok(groups) => settings.sidebar_groups = groups,
                Err(e) => debug!("ignoring stored sidebar groups: {}", e),
            }
        }

        Self { store, settings }
    }

    /// Current settings.
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Current colour theme.
    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    /// Switch to `theme` and save it.
    pub async fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.write(THEME_KEY, theme.as_str()).await;
    }

    /// Switch between dark and light, returning the new theme.
    pub async fn toggle_theme(&mut self) -> Theme {
        let next = self.settings.theme.toggled();
        self.set_theme(next).await;
        next
    }

    /// Whether animations are turned off.
    pub fn quiet_mode(&self) -> bool {
        self.settings.quiet_mode
    }

    /// Turn quiet mode on or off and save it.
    pub async fn set_quiet_mode(&mut self, quiet: bool) {
        self.settings.quiet_mode = quiet;
        self.write(QUIET_MODE_KEY, if quiet { "1" } else { "0" }).await;
    }

    /// Whether the whole sidebar is collapsed.
    pub fn sidebar_collapsed(&self) -> bool {
        self.settings.sidebar_collapsed
    }

    /// Collapse or expand the whole sidebar and save it.
    pub async fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.settings.sidebar_collapsed = collapsed;
        self.write(SIDEBAR_COLLAPSED_KEY, &collapsed.to_string())
            .await;
    }

    /// Flip one sidebar group, returning whether it is now collapsed.
    pub async fn toggle_sidebar_group(&mut self, group: &str) -> bool {
        let collapsed = !self.settings.is_group_collapsed(group);
        self.settings
            .sidebar_groups
            .insert(group.to_string(), collapsed);
        self.write_groups().await;
        collapsed
    }

    /// Collapse every group, or expand every group if all are collapsed.
    pub async fn toggle_all_sidebar_groups(&mut self) -> bool {
        let all_collapsed = SIDEBAR_GROUPS
            .iter()
            .all(|g| self.settings.is_group_collapsed(g));
        let collapse = !all_collapsed;
        self.settings.sidebar_groups = SIDEBAR_GROUPS
            .iter()
            .map(|g| (g.to_string(), collapse))
            .collect();
        self.write_groups().await;
        collapse
    }

    async fn write_groups(&self) {
        match serde_json::to_string(&self.settings.sidebar_groups) {
            Ok(raw) => self.write(SIDEBAR_GROUPS_KEY, &raw).await,
            Err(e) => warn!("failed to serialize sidebar groups: {}", e),
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value).await {
            warn!("failed to save setting '{}': {}", key, e);
        }
    }
}

impl fmt::Debug for SettingsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

async fn read(store: &dyn LocalStore, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(e) => {
            debug!("failed to read setting '{}': {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_defaults() {
        let store = Arc::new(MemoryStore::new());
        let ctx = SettingsContext::load(store).await;
        assert_eq!(ctx.theme(), Theme::Dark);
        assert!(!ctx.quiet_mode());
        assert!(!ctx.sidebar_collapsed());
        assert!(!ctx.settings().is_group_collapsed("masters"));
    }

    #[tokio::test]
    async fn test_stored_encodings() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = SettingsContext::load(Arc::clone(&store) as Arc<dyn LocalStore>).await;

        assert_eq!(ctx.toggle_theme().await, Theme::Light);
        ctx.set_quiet_mode(true).await;
        ctx.set_sidebar_collapsed(true).await;
        assert!(ctx.toggle_sidebar_group("tools").await);

        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("light"));
        assert_eq!(store.get("quiet-mode").await.unwrap().as_deref(), Some("1"));
        assert_eq!(
            store.get("sidebar-collapsed").await.unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            store.get("sidebar-groups").await.unwrap().as_deref(),
            Some(r#"{"tools":true}"#)
        );

        let reloaded = SettingsContext::load(store).await;
        assert_eq!(reloaded.settings(), ctx.settings());
    }

    #[tokio::test]
    async fn test_bad_values_fall_back() {
        let store = Arc::new(MemoryStore::new());
        store.set("theme", "sepia").await.unwrap();
        store.set("sidebar-groups", "[").await.unwrap();
        let ctx = SettingsContext::load(store).await;
        assert_eq!(ctx.theme(), Theme::Dark);
        assert!(ctx.settings().sidebar_groups.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_all_groups() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = SettingsContext::load(store).await;
        ctx.toggle_sidebar_group("masters").await;

        assert!(ctx.toggle_all_sidebar_groups().await);
        assert!(SIDEBAR_GROUPS.iter().all(|g| ctx.settings().is_group_collapsed(g)));
        assert!(!ctx.toggle_all_sidebar_groups().await);
        assert!(SIDEBAR_GROUPS.iter().all(|g| !ctx.settings().is_group_collapsed(g)));
    }

    #[tokio::test]
    async fn test_write_failure_keeps_value() {
        let store = Arc::new(MemoryStore::with_quota(1));
        let mut ctx = SettingsContext::load(Arc::clone(&store) as Arc<dyn LocalStore>).await;
        ctx.set_theme(Theme::Light).await;
        assert_eq!(ctx.theme(), Theme::Light);
        assert_eq!(store.get("theme").await.unwrap(), None);
    }
}
