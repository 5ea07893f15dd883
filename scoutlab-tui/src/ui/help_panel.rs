//! Help panel: key bindings and glossary.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "r", "Re-run the pipeline and reload tables");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Teams");
    key(&mut lines, "[ / ]", "Previous / next season");
    key(&mut lines, "c", "Cycle competition type");
    key(&mut lines, "j / k", "Scroll standings");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Players");
    key(&mut lines, "c / p / t", "Cycle category / position / contract filter");
    key(&mut lines, "o / d", "Cycle sort column / flip order");
    key(&mut lines, "0", "Reset filters");
    key(&mut lines, "x", "Export the filtered list as CSV");
    key(&mut lines, "Enter", "Open the player's profile");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Profile");
    key(&mut lines, "[ / ]", "Previous / next season");
    key(&mut lines, "j / k", "Select player");
    key(&mut lines, "m", "Pin / unpin player for comparison");
    key(&mut lines, "x", "Export profile (or comparison) as Markdown");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 — Help (this panel)");
    key(&mut lines, "e", "Open error history overlay");
    lines.push(Line::from(""));

    section(&mut lines, "Glossary");
    key(&mut lines, "Struggling", "Age ≤ 28, signable, PTS/REB/AST percentile ≤ 25 in any");
    key(&mut lines, "Well-Rounded", "Age ≤ 28, signable, PTS/REB/AST/TS% strictly in 25-75");
    key(&mut lines, "Signable", "No contract, free agent, uncontracted or expiring");
    key(&mut lines, "Available now", "Free agent, uncontracted or no contract data");
    key(&mut lines, "TS%", "PTS / (2 × (FGA + 0.44 × FTA))");
    key(&mut lines, "P%", "Points percentile within the season (1-100)");
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        format!(
            "Warehouse: {}   Exports: {}",
            app.config.warehouse_dir().display(),
            app.config.export_dir.display()
        ),
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
