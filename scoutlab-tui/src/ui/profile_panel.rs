//! Profile panel: player list, radar bars, advanced metrics, history,
//! and an optional pinned comparison.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use scoutlab_core::profile::PlayerProfile;

use crate::app::AppState;
use crate::theme;
use crate::ui::{bar, opt, truncate, visible_window};

const BAR_WIDTH: usize = 25;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(area);

    render_player_list(f, chunks[0], app);
    render_detail(f, chunks[1], app);
}

fn render_player_list(f: &mut Frame, area: Rect, app: &AppState) {
    let season = app
        .profile_season()
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme::muted())
        .title(format!(" Season {season} [[/]] "))
        .title_style(theme::accent());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let players = app.profile_players();
    let mut lines: Vec<Line> = Vec::new();
    if players.is_empty() {
        lines.push(Line::from(Span::styled("No player stats.", theme::muted())));
    }
    for i in visible_window(app.profile.cursor, players.len(), inner.height as usize) {
        let name = &players[i].player;
        let pinned = app.profile.compare.as_deref() == Some(name.as_str());
        let style = if i == app.profile.cursor {
            theme::cursor()
        } else if pinned {
            theme::neutral()
        } else {
            theme::text()
        };
        let marker = if pinned { "*" } else { " " };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", truncate(name, inner.width.saturating_sub(2) as usize)),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_detail(f: &mut Frame, area: Rect, app: &AppState) {
    let inner = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(1),
        ..area
    };
    let Some(p) = app.current_profile() else {
        let hint = Paragraph::new(Span::styled(
            "Select a player. Press r to run the pipeline if the list is empty.",
            theme::muted(),
        ));
        f.render_widget(hint, inner);
        return;
    };
    let other = app.compare_profile();

    let mut lines: Vec<Line> = Vec::new();
    header(&mut lines, &p, other.as_ref());
    lines.push(Line::from(""));
    radar(&mut lines, &p, other.as_ref());
    lines.push(Line::from(""));
    advanced(&mut lines, &p);
    lines.push(Line::from(""));
    history(&mut lines, &p);

    f.render_widget(Paragraph::new(lines), inner);
}

fn header(lines: &mut Vec<Line<'static>>, p: &PlayerProfile, other: Option<&PlayerProfile>) {
    let line = &p.line;
    let mut title = vec![Span::styled(line.player.clone(), theme::accent_bold())];
    if let Some(o) = other {
        title.push(Span::styled("  vs  ", theme::muted()));
        title.push(Span::styled(o.line.player.clone(), theme::neutral()));
    }
    lines.push(Line::from(title));
    lines.push(Line::from(Span::styled(
        format!(
            "{} · {} · {} games   [m]compare [x]export",
            line.team.as_deref().unwrap_or("-"),
            line.pos.as_deref().unwrap_or("-"),
            line.games_played
        ),
        theme::muted(),
    )));
    lines.push(Line::from(""));

    let mut heading = format!("{:<6} {:>8} {:>8}", "", "Player", "League");
    if other.is_some() {
        heading.push_str(&format!(" {:>8}", "Compare"));
    }
    lines.push(Line::from(Span::styled(heading, theme::accent_bold())));

    let rows = [
        ("PTS", line.points_per_game, p.league.points_per_game, other.and_then(|o| o.line.points_per_game)),
        ("REB", line.rebounds_per_game, p.league.rebounds_per_game, other.and_then(|o| o.line.rebounds_per_game)),
        ("AST", line.assists_per_game, p.league.assists_per_game, other.and_then(|o| o.line.assists_per_game)),
    ];
    for (label, mine, league, theirs) in rows {
        let better = mine.is_some_and(|v| v >= league);
        let mut spans = vec![
            Span::styled(format!("{label:<6} "), theme::muted()),
            Span::styled(
                format!("{:>8}", opt(mine, 1)),
                if better { theme::positive() } else { theme::text() },
            ),
            Span::styled(format!(" {league:>8.1}"), theme::muted()),
        ];
        if other.is_some() {
            spans.push(Span::styled(format!(" {:>8}", opt(theirs, 1)), theme::neutral()));
        }
        lines.push(Line::from(spans));
    }
}

fn radar(lines: &mut Vec<Line<'static>>, p: &PlayerProfile, other: Option<&PlayerProfile>) {
    lines.push(Line::from(Span::styled("Radar (0-100)", theme::accent_bold())));
    let theirs = other.map(|o| o.radar.axes());
    for (i, (axis, value)) in p.radar.axes().into_iter().enumerate() {
        let mut spans = vec![
            Span::styled(format!("{axis:<13}"), theme::muted()),
            Span::styled(bar(value, 100.0, BAR_WIDTH), theme::percentile(value)),
            Span::styled(format!(" {value:>3.0}"), theme::text()),
        ];
        if let Some(theirs) = &theirs {
            let (_, v) = theirs[i];
            spans.push(Span::styled(format!("  {v:>3.0}"), theme::neutral()));
        }
        lines.push(Line::from(spans));
    }
}

fn advanced(lines: &mut Vec<Line<'static>>, p: &PlayerProfile) {
    let a = &p.advanced;
    let r = &p.ranks;
    lines.push(Line::from(Span::styled("Advanced", theme::accent_bold())));
    let rows = [
        ("Availability", format!("{:.1}%", a.availability_pct)),
        ("Production/G", format!("{:.1}", a.production_per_game)),
        ("Est. PTS/min", format!("{:.2}", a.est_points_per_minute)),
        (
            "Percentiles",
            format!(
                "PTS {:.0} · REB {:.0} · AST {:.0}",
                a.points_percentile, a.rebounds_percentile, a.assists_percentile
            ),
        ),
        (
            "League rank",
            format!(
                "PTS {:.0} · REB {:.0} · AST {:.0} of {}",
                r.points, r.rebounds, r.assists, r.out_of
            ),
        ),
    ];
    for (label, value) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<13}"), theme::muted()),
            Span::styled(value, theme::text()),
        ]));
    }
}

fn history(lines: &mut Vec<Line<'static>>, p: &PlayerProfile) {
    if p.history.len() < 2 {
        return;
    }
    lines.push(Line::from(Span::styled("History", theme::accent_bold())));
    for h in &p.history {
        let style = if h.season == p.line.season {
            theme::accent()
        } else {
            theme::text()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{:<6} {:<5} {:>3} g  {:>5} pts {:>5} reb {:>5} ast",
                h.season,
                h.team.as_deref().unwrap_or("-"),
                h.games_played,
                opt(h.points_per_game, 1),
                opt(h.rebounds_per_game, 1),
                opt(h.assists_per_game, 1),
            ),
            style,
        )));
    }
}
