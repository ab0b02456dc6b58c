// Formation board widget: the 4-3-3 drawn as four lines of slot cards.
//
// Empty slots show a "+" placeholder; filled slots show the player's name
// and rating. The slot under the cursor is highlighted.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use xidraft_core::dataset::Player;
use xidraft_core::draft::positions::base_key;

use crate::tui::ViewState;

/// Board rows from attack to goal. Every declared formation slot appears once.
pub const BOARD_ROWS: [&[&str]; 4] = [
    &["LW", "ST", "RW"],
    &["CM_L", "CM_C", "CM_R"],
    &["LB", "CB_L", "CB_R", "RB"],
    &["GK"],
];

/// Render the formation board into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Formation 4-3-3 ")
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Ratio(1, BOARD_ROWS.len() as u32); 4]).split(inner);
    let selected = state.selected_slot();

    for (row_area, slots) in rows.iter().zip(BOARD_ROWS.iter()) {
        let n = slots.len() as u32;
        let cells =
            Layout::horizontal(vec![Constraint::Ratio(1, n); slots.len()]).split(*row_area);
        for (cell, slot) in cells.iter().zip(slots.iter()) {
            let player = state.snapshot.player_at(slot);
            render_cell(frame, *cell, slot, player, *slot == selected);
        }
    }
}

fn render_cell(frame: &mut Frame, area: Rect, slot: &str, player: Option<&Player>, selected: bool) {
    let border_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if player.is_some() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", base_key(slot)));

    let lines = match player {
        Some(p) => vec![
            Line::from(Span::styled(
                p.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} {}", p.ovr, p.position),
                Style::default().fg(rating_color(p.ovr)),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "+",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).centered().block(block), area);
}

/// Card color by rating band.
pub fn rating_color(ovr: u32) -> Color {
    match ovr {
        0..=79 => Color::Gray,
        80..=84 => Color::Green,
        85..=87 => Color::Yellow,
        _ => Color::Magenta,
    }
}

/// Plain cell text, for tests.
pub fn format_cell_text(slot: &str, player: Option<&Player>) -> String {
    match player {
        Some(p) => format!("{}: {} {}", base_key(slot), p.name, p.ovr),
        None => format!("{}: +", base_key(slot)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_player;
    use xidraft_core::draft::positions::FORMATION_433;
    use xidraft_core::protocol::SlotAssignment;

    #[test]
    fn board_covers_every_declared_slot_once() {
        let mut board: Vec<&str> = BOARD_ROWS.iter().flat_map(|r| r.iter().copied()).collect();
        let mut declared = FORMATION_433.to_vec();
        board.sort_unstable();
        declared.sort_unstable();
        assert_eq!(board, declared);
    }

    #[test]
    fn cell_text_uses_base_label() {
        assert_eq!(format_cell_text("CB_L", None), "CB: +");
        let p = sample_player("1", "Saliba", "CB", 87);
        assert_eq!(format_cell_text("CB_R", Some(&p)), "CB: Saliba 87");
    }

    #[test]
    fn rating_bands() {
        assert_eq!(rating_color(91), Color::Magenta);
        assert_eq!(rating_color(85), Color::Yellow);
        assert_eq!(rating_color(80), Color::Green);
        assert_eq!(rating_color(79), Color::Gray);
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(80, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_shows_drafted_player() {
        let backend = ratatui::backend::TestBackend::new(90, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.snapshot.assignments.push(SlotAssignment {
            slot: "GK".into(),
            player: sample_player("1", "Raya", "GK", 86),
        });
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Raya"));
        assert!(text.contains("86 GK"));
    }
}
