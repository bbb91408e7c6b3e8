use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::calc::button::{Button, KEYPAD, KEYPAD_COLUMNS};
use crate::ui::layout::grid_cells;
use crate::ui::theme::Theme;

const KEYPAD_ROWS: usize = KEYPAD.len();

/// Keyboard focus on the keypad grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeypadFocus {
    pub row: usize,
    pub col: usize,
}

impl Default for KeypadFocus {
    fn default() -> Self {
        let (row, col) = Button::Equals.position().unwrap_or((0, 0));
        Self { row, col }
    }
}

impl KeypadFocus {
    /// Step forward (or back) through the occupied cells, wrapping.
    pub fn cycle(self, forward: bool) -> Self {
        let cells: Vec<(usize, usize)> = (0..KEYPAD_ROWS)
            .flat_map(|row| (0..KEYPAD_COLUMNS).map(move |col| (row, col)))
            .filter(|&(row, col)| KEYPAD[row][col].is_some())
            .collect();
        let idx = cells
            .iter()
            .position(|&(r, c)| r == self.row && c == self.col)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % cells.len()
        } else {
            (idx + cells.len() - 1) % cells.len()
        };
        let (row, col) = cells[next];
        Self { row, col }
    }

    pub fn button(self) -> Option<Button> {
        KEYPAD.get(self.row)?.get(self.col).copied().flatten()
    }
}

pub struct Keypad<'a> {
    focus: KeypadFocus,
    theme: &'a Theme,
}

impl<'a> Keypad<'a> {
    pub fn new(focus: KeypadFocus, theme: &'a Theme) -> Self {
        Self { focus, theme }
    }

    fn block(&self) -> Block<'static> {
        Block::bordered()
            .border_style(Style::default().fg(self.theme.colors.border()))
            .style(Style::default().bg(self.theme.colors.bg()))
    }
}

/// Map a click at (x, y) inside the keypad `area` to the button under it.
pub fn hit_test(area: Rect, x: u16, y: u16) -> Option<Button> {
    let inner = Block::bordered().inner(area);
    let cells = grid_cells(inner, KEYPAD_ROWS, KEYPAD_COLUMNS);
    cells.iter().enumerate().find_map(|(row, row_cells)| {
        row_cells.iter().enumerate().find_map(|(col, cell)| {
            let inside =
                x >= cell.x && x < cell.x + cell.width && y >= cell.y && y < cell.y + cell.height;
            if inside { KEYPAD[row][col] } else { None }
        })
    })
}

impl Widget for Keypad<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < KEYPAD_ROWS as u16 || inner.width < KEYPAD_COLUMNS as u16 * 3 {
            return;
        }

        let cells = grid_cells(inner, KEYPAD_ROWS, KEYPAD_COLUMNS);
        for (row, row_cells) in cells.iter().enumerate() {
            for (col, cell) in row_cells.iter().enumerate() {
                let Some(button) = KEYPAD[row][col] else {
                    continue;
                };
                let is_focused = self.focus.row == row && self.focus.col == col;

                let fg = if button.is_operator() {
                    colors.key_operator()
                } else if button.is_action() {
                    colors.key_action()
                } else {
                    colors.key_fg()
                };
                let bg = if is_focused {
                    colors.key_focused_bg()
                } else {
                    colors.key_bg()
                };
                let mut style = Style::default().fg(fg).bg(bg);
                if is_focused {
                    style = style.add_modifier(Modifier::BOLD);
                }

                // Leave a one-column gutter between keys
                let face = Rect {
                    width: cell.width.saturating_sub(1).max(1),
                    ..*cell
                };
                buf.set_style(face, style);

                let label_y = face.y + face.height.saturating_sub(1) / 2;
                Paragraph::new(Line::from(button.label()))
                    .alignment(Alignment::Center)
                    .style(style)
                    .render(Rect { y: label_y, height: 1, ..face }, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::editor::Operator;

    #[test]
    fn default_focus_is_equals() {
        assert_eq!(KeypadFocus::default().button(), Some(Button::Equals));
    }

    #[test]
    fn cycle_skips_empty_cells_and_wraps() {
        let focus = KeypadFocus::default().cycle(true);
        // The cell after "=" is empty, so focus wraps to the first key
        assert_eq!(focus.button(), Some(Button::Clear));
        let back = focus.cycle(false);
        assert_eq!(back.button(), Some(Button::Equals));
    }

    #[test]
    fn hit_test_maps_cells() {
        // Inner area 40x12 -> cells of 10x2
        let area = Rect::new(0, 0, 42, 14);
        assert_eq!(hit_test(area, 1, 1), Some(Button::Clear));
        assert_eq!(
            hit_test(area, 35, 3),
            Some(Button::Operator(Operator::Divide))
        );
        assert_eq!(hit_test(area, 25, 11), Some(Button::Equals));
        assert_eq!(hit_test(area, 35, 11), None);
        assert_eq!(hit_test(area, 0, 0), None);
    }

    #[test]
    fn renders_labels() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 42, 14);
        let mut buf = Buffer::empty(area);
        Keypad::new(KeypadFocus::default(), &theme).render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("AC"));
        assert!(text.contains("+/-"));
        assert!(text.contains("÷"));
    }
}
