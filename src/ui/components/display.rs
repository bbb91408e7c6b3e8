use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::calc::calculator::Calculator;
use crate::ui::theme::Theme;

/// Expression line with a block cursor, result line underneath.
pub struct Display<'a> {
    calculator: &'a Calculator,
    theme: &'a Theme,
}

impl<'a> Display<'a> {
    pub fn new(calculator: &'a Calculator, theme: &'a Theme) -> Self {
        Self { calculator, theme }
    }
}

impl Widget for Display<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let (before, at_cursor, after) = self.calculator.expression.split_at_cursor();
        let text_style = Style::default().fg(colors.fg());
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
        let expression_line = Line::from(vec![
            Span::styled(before, text_style),
            Span::styled(at_cursor.map_or(" ".to_string(), String::from), cursor_style),
            Span::styled(after, text_style),
        ]);
        Paragraph::new(expression_line)
            .alignment(Alignment::Right)
            .render(Rect { height: 1, ..inner }, buf);

        if inner.height < 2 {
            return;
        }
        let result_style = if self.calculator.is_error() {
            Style::default().fg(colors.error())
        } else {
            Style::default()
                .fg(colors.result())
                .add_modifier(Modifier::BOLD)
        };
        Paragraph::new(Line::from(Span::styled(
            self.calculator.result.text(),
            result_style,
        )))
        .alignment(Alignment::Right)
        .render(Rect { y: inner.y + 1, height: 1, ..inner }, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::button::Button;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_expression_and_error() {
        let theme = Theme::default();
        let mut calc = Calculator::new();
        calc.handle_label("2");
        calc.handle_label("+");
        calc.press(Button::Equals);

        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        Display::new(&calc, &theme).render(area, &mut buf);

        assert!(row_text(&buf, 1).contains("2 +"));
        assert!(row_text(&buf, 2).contains("Syntax Error"));
    }
}
