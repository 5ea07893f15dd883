//! Keyboard input dispatch: overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, ErrorCategory, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            app.active_panel = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel.prev()
            } else {
                app.active_panel.next()
            };
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            app.request_rerun();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Teams => handle_teams_key(app, key),
        Panel::Players => handle_players_key(app, key),
        Panel::Profile => handle_profile_key(app, key),
        Panel::Help => handle_help_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_teams_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_team_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_team_cursor(-1),
        KeyCode::PageDown => app.move_team_cursor(10),
        KeyCode::PageUp => app.move_team_cursor(-10),
        KeyCode::Char(']') => app.cycle_team_season(1),
        KeyCode::Char('[') => app.cycle_team_season(-1),
        KeyCode::Char('c') => app.cycle_competition(),
        _ => {}
    }
}

fn handle_players_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_player_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_player_cursor(-1),
        KeyCode::PageDown => app.move_player_cursor(10),
        KeyCode::PageUp => app.move_player_cursor(-10),
        KeyCode::Char('c') => app.cycle_category(),
        KeyCode::Char('p') => app.cycle_position(),
        KeyCode::Char('t') => app.cycle_contract(),
        KeyCode::Char('o') => app.cycle_sort(),
        KeyCode::Char('d') => app.toggle_order(),
        KeyCode::Char('0') => app.reset_filters(),
        KeyCode::Char('x') => match app.export_targets() {
            Ok(path) => app.set_status(format!("Exported {}", path.display())),
            Err(e) => app.push_error(ErrorCategory::Export, format!("{e:#}"), "targets CSV".into()),
        },
        KeyCode::Enter => {
            let Some((player, season)) = app
                .selected_target()
                .map(|r| (r.player.clone(), r.season))
            else {
                return;
            };
            if app.open_profile(&player, season) {
                app.active_panel = Panel::Profile;
            } else {
                app.set_warning(format!("No {season} stats for {player}"));
            }
        }
        _ => {}
    }
}

fn handle_profile_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_profile_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_profile_cursor(-1),
        KeyCode::PageDown => app.move_profile_cursor(10),
        KeyCode::PageUp => app.move_profile_cursor(-10),
        KeyCode::Char(']') => app.cycle_profile_season(1),
        KeyCode::Char('[') => app.cycle_profile_season(-1),
        KeyCode::Char('m') => app.toggle_compare(),
        KeyCode::Char('x') => match app.export_profile() {
            Ok(path) => app.set_status(format!("Exported {}", path.display())),
            Err(e) => app.push_error(ErrorCategory::Export, format!("{e:#}"), "profile report".into()),
        },
        _ => {}
    }
}

fn handle_help_key(app: &mut AppState, key: KeyEvent) {
    if let KeyCode::Char('e') = key.code {
        app.overlay = Overlay::ErrorHistory;
        app.error_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app_with, sample_tables};
    use scoutlab_core::domain::GLeagueCategory;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn number_keys_switch_panels() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_panel, Panel::Profile);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel, Panel::Help);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_panel, Panel::Profile);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn welcome_swallows_first_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        app.overlay = Overlay::Welcome;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn enter_on_target_opens_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.players.filter.category, Some(GLeagueCategory::Struggling));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.active_panel, Panel::Profile);
        assert_eq!(app.current_player(), Some("Ann"));
    }

    #[test]
    fn export_key_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('x'));
        let (msg, _) = app.status_message.clone().unwrap();
        assert!(msg.starts_with("Exported"), "{msg}");
    }

    #[test]
    fn error_overlay_opens_from_help() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
    }
}
