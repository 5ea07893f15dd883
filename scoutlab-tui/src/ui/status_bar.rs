//! Bottom status bar: panel hints, pipeline state, last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " 1:Teams 2:Players 3:Profile 4:Help r:run q:quit",
        theme::muted(),
    )];

    spans.push(Span::raw(" | "));
    if app.pipeline_running {
        spans.push(Span::styled("running… ", theme::warning()));
    } else if let Some(run) = &app.tables.last_run {
        spans.push(Span::styled(
            format!("run {} ", run.run_id.short()),
            theme::neutral(),
        ));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
