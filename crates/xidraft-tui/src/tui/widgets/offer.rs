// Draft modal widget: scouting notice, offer cards, empty state, player detail.
//
// Drawn centered over the formation board whenever `ViewState::modal` is set.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use xidraft_core::dataset::Player;
use xidraft_core::draft::positions::base_key;

use super::confirm::centered_rect;
use super::formation::rating_color;
use crate::tui::{DraftModal, ViewState};

const MODAL_WIDTH: u16 = 78;
const MODAL_HEIGHT: u16 = 14;

/// Shown when a slot has no eligible, unused players left.
pub const EMPTY_OFFER_TEXT: &str = "No players found available.";

/// Render the draft modal over `area`. Does nothing when no modal is open.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(modal) = &state.modal else {
        return;
    };

    let modal_area = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
    frame.render_widget(Clear, modal_area);

    match modal {
        DraftModal::Scouting { slot } => {
            let block = modal_block(format!(" Draft {} ", base_key(slot)));
            let paragraph = Paragraph::new(vec![
                Line::default(),
                Line::from(Span::styled(
                    format!("Scouting {} candidates...", base_key(slot)),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::ITALIC),
                )),
            ])
            .centered()
            .block(block);
            frame.render_widget(paragraph, modal_area);
        }
        DraftModal::Offer {
            slot, candidates, ..
        } if candidates.is_empty() => {
            let block = modal_block(format!(" Draft {} ", base_key(slot)));
            let paragraph = Paragraph::new(vec![
                Line::default(),
                Line::from(Span::styled(
                    EMPTY_OFFER_TEXT,
                    Style::default().fg(Color::Red),
                )),
            ])
            .centered()
            .block(block);
            frame.render_widget(paragraph, modal_area);
        }
        DraftModal::Offer {
            slot,
            candidates,
            selected,
        } => render_cards(frame, modal_area, slot, candidates, *selected),
        DraftModal::Detail { slot } => {
            let block = modal_block(format!(" {} ", base_key(slot)));
            let lines = match state.snapshot.player_at(slot) {
                Some(player) => detail_lines(player),
                None => vec![Line::from("Empty slot")],
            };
            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, modal_area);
        }
    }
}

fn modal_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(Color::Black))
}

fn render_cards(frame: &mut Frame, area: Rect, slot: &str, candidates: &[Player], selected: usize) {
    let block = modal_block(format!(" Draft {}: pick one ", base_key(slot)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let n = candidates.len() as u32;
    let cells =
        Layout::horizontal(vec![Constraint::Ratio(1, n); candidates.len()]).split(inner);

    for (idx, (cell, player)) in cells.iter().zip(candidates).enumerate() {
        let is_selected = idx == selected;
        let border = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let card = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", idx + 1));

        let mut lines = vec![Line::from(Span::styled(
            format!("{} {}", player.ovr, player.position),
            Style::default()
                .fg(rating_color(player.ovr))
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(
            format_card_lines(player)
                .into_iter()
                .skip(1)
                .map(Line::from),
        );

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .centered()
            .block(card);
        frame.render_widget(paragraph, *cell);
    }
}

/// Card contents: rating line, name, team, nation, league.
pub fn format_card_lines(player: &Player) -> Vec<String> {
    vec![
        format!("{} {}", player.ovr, player.position),
        player.name.clone(),
        player.team.clone(),
        player.nation.clone(),
        player.league.clone(),
    ]
}

fn detail_lines(player: &Player) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {name:<8}"), label),
            Span::raw(value),
        ])
    };
    vec![
        Line::from(Span::styled(
            format!("  {}", player.name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        field("Rating", player.ovr.to_string()),
        field("Position", player.position.clone()),
        field("Team", player.team.clone()),
        field("Nation", player.nation.clone()),
        field("League", player.league.clone()),
        field("Card", player.image().to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
