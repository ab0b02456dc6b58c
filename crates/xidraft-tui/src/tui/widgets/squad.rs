// Squad widget: every formation slot with its player, in board order.
//
// "ST: Erling Haaland (91)" or "ST: [empty]". The slot under the board cursor
// is highlighted.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use xidraft_core::dataset::Player;
use xidraft_core::draft::positions::FORMATION_433;

use crate::tui::ViewState;

/// Render the squad sidebar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let selected = state.selected_slot();

    let items: Vec<ListItem> = FORMATION_433
        .iter()
        .map(|slot| {
            let player = state.snapshot.player_at(slot);
            let style = match (player.is_some(), *slot == selected) {
                (_, true) => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {}", format_slot_text(slot, player)),
                style,
            )))
        })
        .collect();

    let title = format!(
        "Squad ({}/{})",
        state.snapshot.filled(),
        FORMATION_433.len()
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

/// Format a squad slot as a plain string.
pub fn format_slot_text(slot: &str, player: Option<&Player>) -> String {
    match player {
        Some(p) => format!("{}: {} ({})", slot, p.name, p.ovr),
        None => format!("{}: [empty]", slot),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
