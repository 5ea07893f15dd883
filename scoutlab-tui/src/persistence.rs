//! UI preferences: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use scoutlab_core::targets::TargetFilter;

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub filter: TargetFilter,
    pub competition: Option<String>,
    pub compare: Option<String>,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Teams,
            filter: TargetFilter::default(),
            competition: None,
            compare: None,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        filter: app.players.filter.clone(),
        competition: app.competition().map(str::to_string),
        compare: app.profile.compare.clone(),
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    app.players.filter = state.filter;
    app.players.cursor = 0;
    if let Some(competition) = &state.competition {
        app.select_competition(competition);
    }
    app.profile.compare = state.compare;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app_with, sample_tables};
    use scoutlab_core::domain::GLeagueCategory;
    use scoutlab_core::targets::SortKey;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("dashboard.json");

        let mut state = PersistedState::default();
        state.active_panel = Panel::Profile;
        state.filter.category = Some(GLeagueCategory::WellRounded);
        state.filter.sort = SortKey::Age;
        state.welcome_dismissed = true;

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_panel, Panel::Profile);
        assert_eq!(loaded.filter, state.filter);
        assert!(loaded.welcome_dismissed);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/dashboard.json"));
        assert_eq!(loaded.active_panel, Panel::Teams);
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.filter, TargetFilter::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"active_panel":"Players"}"#).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.active_panel, Panel::Players);
        assert_eq!(loaded.filter, TargetFilter::default());
    }

    #[test]
    fn extract_then_apply_restores_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        app.active_panel = Panel::Players;
        app.cycle_category();
        app.toggle_order();
        let saved = extract(&app);

        let mut fresh = app_with(dir.path(), sample_tables());
        apply(&mut fresh, saved);
        assert_eq!(fresh.active_panel, Panel::Players);
        assert_eq!(fresh.players.filter, app.players.filter);
        assert_eq!(fresh.overlay, Overlay::None);
    }

    #[test]
    fn first_launch_shows_welcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        apply(&mut app, PersistedState::default());
        assert_eq!(app.overlay, Overlay::Welcome);
    }
}
