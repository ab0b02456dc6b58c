// Confirmation overlay widget.
//
// Renders a centered yes/no dialog for destructive actions (reset, catalog
// switch, quit). Displayed on top of everything while `ViewState::confirm`
// is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::ConfirmAction;

const DIALOG_HEIGHT: u16 = 5;

/// Title and question for a pending action.
pub fn prompt(action: ConfirmAction) -> (&'static str, String) {
    match action {
        ConfirmAction::ResetSquad => (" Reset? ", "Clear the whole squad?".to_string()),
        ConfirmAction::SwitchSource(source) => (
            " Switch catalog? ",
            format!("Load {}? The squad will be cleared.", source.label()),
        ),
        ConfirmAction::Quit => (" Quit? ", "Really quit?".to_string()),
    }
}

/// Render the confirmation overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, action: ConfirmAction) {
    let (title, question) = prompt(action);
    let width = (question.chars().count() as u16).saturating_add(12);
    let dialog_area = centered_rect(width, DIALOG_HEIGHT, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::from(format!("  {question}")),
        Line::from(vec![
            Span::raw("  ("),
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("/"),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(")"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the rectangle is clamped to the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
