// Chemistry widget: team OVR plus the Team/Nation/League badges.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use xidraft_core::draft::chemistry::{ChemistryBadge, BADGE_MIN_COUNT};

use super::formation::rating_color;
use crate::tui::ViewState;

/// Render the chemistry panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let mut lines = vec![Line::from(vec![
        Span::styled(" Team OVR ", Style::default().fg(Color::Gray)),
        Span::styled(
            snapshot.average_rating.to_string(),
            Style::default()
                .fg(rating_color(snapshot.average_rating))
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.push(Line::default());

    if snapshot.badges.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" No links yet ({BADGE_MIN_COUNT}+ shared)"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )));
    } else {
        for badge in &snapshot.badges {
            lines.push(Line::from(Span::styled(
                format!(" {}", format_badge(badge)),
                Style::default().fg(Color::Cyan),
            )));
        }
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Chemistry"));
    frame.render_widget(paragraph, area);
}

/// "Team: Arsenal x3"
pub fn format_badge(badge: &ChemistryBadge) -> String {
    format!("{}: {} x{}", badge.category.label(), badge.value, badge.count)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
