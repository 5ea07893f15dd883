//! Players panel: filtered G-League targets with summary metrics.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::{opt, truncate, visible_window};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let filter = &app.players.filter;
    let mut lines: Vec<Line> = Vec::new();

    let any = |v: Option<&str>| v.unwrap_or("All").to_string();
    lines.push(Line::from(vec![
        Span::styled("Category: ", theme::muted()),
        Span::styled(any(filter.category.map(|c| c.short_label())), theme::accent()),
        Span::styled("  Position: ", theme::muted()),
        Span::styled(any(filter.position.as_deref()), theme::accent()),
        Span::styled("  Contract: ", theme::muted()),
        Span::styled(any(filter.contract.map(|c| c.label())), theme::accent()),
        Span::styled("  Sort: ", theme::muted()),
        Span::styled(
            format!(
                "{} {}",
                filter.sort.label(),
                if filter.descending { "↓" } else { "↑" }
            ),
            theme::accent(),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        "[c]ategory [p]osition [t]contract [o]sort [d]irection [0]reset [x]export [Enter]profile",
        theme::muted(),
    )));

    let summary = app.target_summary();
    lines.push(Line::from(vec![
        Span::styled("Found ", theme::muted()),
        Span::styled(summary.found.to_string(), theme::accent_bold()),
        Span::styled("  Avg age ", theme::muted()),
        Span::styled(opt(summary.average_age, 1), theme::accent_bold()),
        Span::styled("  Available now ", theme::muted()),
        Span::styled(summary.available.to_string(), theme::positive()),
        Span::styled("  Development ", theme::muted()),
        Span::styled(summary.development.to_string(), theme::warning()),
    ]));
    lines.push(Line::from(""));

    let rows = app.visible_targets();
    if rows.is_empty() {
        let msg = if app.tables.targets.is_empty() {
            "No G-League targets yet. Press r to run the pipeline."
        } else {
            "No players match these filters. Press 0 to reset."
        };
        lines.push(Line::from(Span::styled(msg, theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:>3} {:<22} {:>3} {:<5} {:<4} {:>5} {:>5} {:>5} {:>5} {:>4} {:<13} {:<29}",
            "#", "Player", "Age", "Pos", "Team", "PTS", "REB", "AST", "TS%", "P%", "Category", "Contract"
        ),
        theme::accent_bold(),
    )));

    let height = (area.height as usize).saturating_sub(lines.len());
    for i in visible_window(app.players.cursor, rows.len(), height) {
        let r = rows[i];
        let is_cursor = i == app.players.cursor;
        let style = if is_cursor { theme::cursor() } else { theme::text() };
        let pick = |s| if is_cursor { style } else { s };

        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{:>3} {:<22} {:>3} {:<5} {:<4} {:>5} {:>5} {:>5} {:>5} ",
                    i + 1,
                    truncate(&r.player, 22),
                    r.age.map_or_else(|| "-".to_string(), |a| a.to_string()),
                    truncate(r.pos.as_deref().unwrap_or("-"), 5),
                    truncate(r.team.as_deref().unwrap_or("-"), 4),
                    opt(r.pts, 1),
                    opt(r.trb, 1),
                    opt(r.ast, 1),
                    opt(r.ts_pct.map(|v| v * 100.0), 1),
                ),
                style,
            ),
            Span::styled(
                format!("{:>4} ", r.pts_percentile),
                pick(theme::percentile(f64::from(r.pts_percentile))),
            ),
            Span::styled(
                format!("{:<13} ", r.g_league_category.short_label()),
                pick(theme::category(r.g_league_category)),
            ),
            Span::styled(
                format!("{:<29}", r.contract_status.label()),
                pick(theme::status(r.contract_status)),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
