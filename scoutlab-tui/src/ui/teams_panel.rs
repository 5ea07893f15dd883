//! Teams panel: standings for one season and competition, win% bars.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::{bar, opt, truncate, visible_window};

const BAR_WIDTH: usize = 20;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    let season = app
        .team_season()
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    let competition = app.competition().unwrap_or("-");
    lines.push(Line::from(vec![
        Span::styled("Season: ", theme::muted()),
        Span::styled(season, theme::accent()),
        Span::styled("  Competition: ", theme::muted()),
        Span::styled(competition.to_string(), theme::accent()),
        Span::styled("  [[/]]season [c]ompetition [j/k]scroll", theme::muted()),
    ]));
    lines.push(Line::from(""));

    let teams = app.visible_teams();
    if teams.is_empty() {
        lines.push(Line::from(Span::styled(
            "No team stats yet. Press r to run the pipeline.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:>3} {:<6} {:>4} {:>4} {:>4} {:>6} {:<w$} {:>6} {:>6} {:>6} {:>6} {:>6}",
            "#", "Team", "GP", "W", "L", "Win%", "", "PTS", "REB", "AST", "TS%", "A/TO",
            w = BAR_WIDTH
        ),
        theme::accent_bold(),
    )));

    let height = (area.height as usize).saturating_sub(lines.len());
    for i in visible_window(app.teams.cursor, teams.len(), height) {
        let t = teams[i];
        let is_cursor = i == app.teams.cursor;
        let style = if is_cursor { theme::cursor() } else { theme::text() };
        let pct = t.win_pct.unwrap_or(0.0);
        let bar_style = if is_cursor { style } else { theme::win_pct(pct) };
        let record = |v: Option<i64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());

        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{:>3} {:<6} {:>4} {:>4} {:>4} {:>6} ",
                    i + 1,
                    truncate(&t.team, 6),
                    t.gp,
                    record(t.w),
                    record(t.l),
                    opt(t.win_pct, 3),
                ),
                style,
            ),
            Span::styled(bar(pct, 1.0, BAR_WIDTH), bar_style),
            Span::styled(
                format!(
                    " {:>6} {:>6} {:>6} {:>6} {:>6}",
                    opt(t.pts, 1),
                    opt(t.reb, 1),
                    opt(t.ast, 1),
                    opt(t.ts_pct.map(|v| v * 100.0), 1),
                    opt(t.ast_to_tov, 2),
                ),
                style,
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
