// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app loop,
// or into local ViewState changes (cursor movement, opening and closing the
// draft modal, confirmation prompts).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use xidraft_core::protocol::UserCommand;

use super::widgets::formation::BOARD_ROWS;
use super::{ConfirmAction, DraftModal, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should go to the app loop.
/// Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release; act on Press only.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if let Some(action) = view_state.confirm {
        return handle_confirm(key_event, view_state, action);
    }

    if view_state.modal.is_some() {
        return handle_modal(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Left | KeyCode::Char('h') => {
            move_cursor(view_state, 0, -1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            move_cursor(view_state, 0, 1);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(view_state, -1, 0);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(view_state, 1, 0);
            None
        }

        KeyCode::Enter => {
            let slot = view_state.selected_slot();
            if view_state.snapshot.player_at(slot).is_some() {
                view_state.modal = Some(DraftModal::Detail { slot: slot.into() });
                None
            } else {
                Some(request(view_state, slot))
            }
        }
        KeyCode::Char('d') => {
            let slot = view_state.selected_slot();
            Some(request(view_state, slot))
        }

        KeyCode::Char('r') => {
            view_state.confirm = Some(ConfirmAction::ResetSquad);
            None
        }
        KeyCode::Char('s') => {
            let other = view_state.snapshot.source.other();
            view_state.confirm = Some(ConfirmAction::SwitchSource(other));
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm = Some(ConfirmAction::Quit);
            None
        }
        KeyCode::Esc => {
            view_state.notice = None;
            None
        }

        _ => None,
    }
}

/// Open the scouting modal and ask the app loop for an offer.
fn request(view_state: &mut ViewState, slot: &str) -> UserCommand {
    view_state.modal = Some(DraftModal::Scouting { slot: slot.into() });
    UserCommand::RequestCandidates { slot: slot.into() }
}

/// y confirms (q too for the quit prompt); n/Esc cancel; everything else is blocked.
fn handle_confirm(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    action: ConfirmAction,
) -> Option<UserCommand> {
    let confirmed = match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('q') if action == ConfirmAction::Quit => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return None,
    };
    view_state.confirm = None;
    if !confirmed {
        return None;
    }
    match action {
        ConfirmAction::ResetSquad => {
            view_state.modal = None;
            Some(UserCommand::ResetSquad)
        }
        ConfirmAction::SwitchSource(source) => {
            view_state.modal = None;
            view_state.notice = None;
            Some(UserCommand::SwitchSource(source))
        }
        ConfirmAction::Quit => Some(UserCommand::Quit),
    }
}

fn handle_modal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let Some(modal) = view_state.modal.as_mut() else {
        return None;
    };

    match modal {
        DraftModal::Scouting { .. } => {
            if key_event.code == KeyCode::Esc {
                view_state.modal = None;
            }
            None
        }
        DraftModal::Detail { slot } => match key_event.code {
            KeyCode::Esc | KeyCode::Enter => {
                view_state.modal = None;
                None
            }
            KeyCode::Char('d') => {
                let slot = slot.clone();
                Some(request(view_state, &slot))
            }
            _ => None,
        },
        DraftModal::Offer {
            slot,
            candidates,
            selected,
        } => {
            if candidates.is_empty() {
                if matches!(key_event.code, KeyCode::Esc | KeyCode::Enter) {
                    view_state.modal = None;
                }
                return None;
            }
            match key_event.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    *selected = selected.saturating_sub(1);
                    None
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    *selected = (*selected + 1).min(candidates.len() - 1);
                    None
                }
                KeyCode::Enter => {
                    let cmd = sign(slot, candidates, *selected);
                    view_state.modal = None;
                    cmd
                }
                KeyCode::Char(c @ '1'..='9') => {
                    let idx = (c as usize) - ('1' as usize);
                    if idx >= candidates.len() {
                        return None;
                    }
                    let cmd = sign(slot, candidates, idx);
                    view_state.modal = None;
                    cmd
                }
                KeyCode::Esc => {
                    view_state.modal = None;
                    None
                }
                _ => None,
            }
        }
    }
}

fn sign(slot: &str, candidates: &[xidraft_core::dataset::Player], idx: usize) -> Option<UserCommand> {
    candidates.get(idx).map(|p| UserCommand::ConfirmSelection {
        slot: slot.to_string(),
        player_id: p.id.clone(),
    })
}

/// Move the board cursor. Columns clamp to the target row's width.
fn move_cursor(view_state: &mut ViewState, d_row: isize, d_col: isize) {
    let (row, col) = view_state.cursor;
    let rows = BOARD_ROWS.len();
    let new_row = (row as isize + d_row).clamp(0, rows as isize - 1) as usize;
    let width = BOARD_ROWS[new_row].len();
    let col = col.min(width - 1);
    let new_col = (col as isize + d_col).clamp(0, width as isize - 1) as usize;
    view_state.cursor = (new_row, new_col);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
