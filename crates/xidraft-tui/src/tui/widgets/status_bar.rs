// Status bar widget: active catalog, squad progress, team rating, notices.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use xidraft_core::draft::positions::FORMATION_433;
use xidraft_core::protocol::SquadSnapshot;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [catalog] | [squad x/11] | [OVR] | [used] [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            " xidraft ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    for (i, part) in summary_parts(&state.snapshot).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        }
        spans.push(Span::styled(part, Style::default().fg(Color::White)));
    }

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// The plain-text segments of the status bar.
pub fn summary_parts(snapshot: &SquadSnapshot) -> Vec<String> {
    vec![
        format!("{} ({})", snapshot.source.label(), snapshot.catalog_size),
        format!("Squad {}/{}", snapshot.filled(), FORMATION_433.len()),
        format!("OVR {}", snapshot.average_rating),
        format!("Used {}", snapshot.used_count),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
