// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Formation Board (65%)    | Sidebar (35%)          |
// |                          | +- Squad (60%) -------+|
// |                          | +- Chemistry (40%) ---+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: catalog, squad size, team rating.
    pub status_bar: Rect,
    /// The 4-3-3 board. The draft modal is drawn over it.
    pub board: Rect,
    /// Right sidebar top: slot-by-slot squad list.
    pub squad: Rect,
    /// Right sidebar bottom: team OVR and chemistry badges.
    pub chemistry: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // board + sidebar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle);

    let board = horizontal[0];
    let sidebar = horizontal[1];

    let sidebar_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(sidebar);

    AppLayout {
        status_bar,
        board,
        squad: sidebar_sections[0],
        chemistry: sidebar_sections[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("board", layout.board),
            ("squad", layout.squad),
            ("chemistry", layout.chemistry),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn bars_are_one_row() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.help_bar.y, 49);
    }

    #[test]
    fn board_is_wider_than_sidebar() {
        let layout = build_layout(test_area());
        assert!(layout.board.width > layout.squad.width);
        assert_eq!(layout.squad.x, layout.chemistry.x);
        assert_eq!(
            layout.board.width + layout.squad.width,
            test_area().width
        );
    }

    #[test]
    fn sidebar_sections_stack() {
        let layout = build_layout(test_area());
        assert_eq!(layout.chemistry.y, layout.squad.y + layout.squad.height);
        assert!(layout.squad.height > layout.chemistry.height);
    }
}
