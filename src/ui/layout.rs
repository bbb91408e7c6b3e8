use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Widest the calculator column grows; extra space becomes side margin.
const MAX_COLUMN_WIDTH: u16 = 48;
const DISPLAY_HEIGHT: u16 = 4;

pub struct CalcLayout {
    pub header: Rect,
    pub display: Rect,
    pub keypad: Rect,
    pub footer: Rect,
}

impl CalcLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(DISPLAY_HEIGHT),
                Constraint::Min(8),
                Constraint::Length(footer_lines),
            ])
            .split(area);

        Self {
            header: vertical[0],
            display: centered_column(vertical[1]),
            keypad: centered_column(vertical[2]),
            footer: vertical[3],
        }
    }
}

fn centered_column(area: Rect) -> Rect {
    let width = area.width.min(MAX_COLUMN_WIDTH);
    let left = area.x + (area.width - width) / 2;
    Rect::new(left, area.y, width, area.height)
}

/// Split `inner` into `rows` x `cols` equally sized cells, row-major.
pub fn grid_cells(inner: Rect, rows: usize, cols: usize) -> Vec<Vec<Rect>> {
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(inner);

    row_areas
        .iter()
        .map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
                .split(*row)
                .to_vec()
        })
        .collect()
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 32;
    const MIN_POPUP_HEIGHT: u16 = 8;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_is_capped_and_centered() {
        let layout = CalcLayout::new(Rect::new(0, 0, 100, 30), 1);
        assert_eq!(layout.keypad.width, 48);
        assert_eq!(layout.keypad.x, 26);
        assert_eq!(layout.header.width, 100);
        assert_eq!(layout.display.height, 4);
        assert_eq!(layout.footer.height, 1);
    }

    #[test]
    fn narrow_terminal_uses_full_width() {
        let layout = CalcLayout::new(Rect::new(0, 0, 30, 30), 2);
        assert_eq!(layout.keypad.width, 30);
        assert_eq!(layout.keypad.x, 0);
    }

    #[test]
    fn grid_covers_area() {
        let cells = grid_cells(Rect::new(0, 0, 40, 12), 6, 4);
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|row| row.len() == 4));
        assert_eq!(cells[0][0], Rect::new(0, 0, 10, 2));
        assert_eq!(cells[5][3], Rect::new(30, 10, 10, 2));
    }

    #[test]
    fn hints_wrap_to_width() {
        let lines = pack_hint_lines(&["[q] Quit", "[h] History", "[t] Theme"], 22);
        assert_eq!(lines, vec![" [q] Quit  [h] History", " [t] Theme"]);
        assert!(pack_hint_lines(&["[q] Quit"], 0).is_empty());
    }

    #[test]
    fn popup_never_exceeds_area() {
        let area = Rect::new(0, 0, 20, 6);
        let popup = centered_rect(60, 60, area);
        assert_eq!(popup, area);
    }
}
