use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Selectable list of history display strings.
///
/// Selecting an item reports it for recall. A refresh re-selects the first
/// item programmatically; that one notification is swallowed so a refresh
/// never looks like the user picking an entry.
#[derive(Debug, Default)]
pub struct HistoryDropdown {
    items: Vec<String>,
    highlighted: usize,
    suppress_next_selection: bool,
    pub open: bool,
}

impl HistoryDropdown {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Replace the list contents after the log changed.
    pub fn refresh(&mut self, items: &[String]) {
        self.items = items.to_vec();
        self.suppress_next_selection = true;
        let recalled = self.select(0);
        debug_assert!(recalled.is_none());
        // Nothing was selected if the list is empty; don't leak the flag.
        self.suppress_next_selection = false;
    }

    /// Select `index`. Returns the entry to recall, or `None` when the index
    /// is out of range or the selection came from a refresh.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let item = self.items.get(index)?.clone();
        self.highlighted = index;
        if std::mem::take(&mut self.suppress_next_selection) {
            return None;
        }
        Some(item)
    }

    /// Select the highlighted entry, as the user confirming it.
    pub fn confirm(&mut self) -> Option<String> {
        self.select(self.highlighted)
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.highlighted > 0 {
            self.highlighted -= 1;
        } else {
            self.highlighted = self.items.len() - 1;
        }
    }
}

pub struct HistoryPopup<'a> {
    dropdown: &'a HistoryDropdown,
    theme: &'a Theme,
}

impl<'a> HistoryPopup<'a> {
    pub fn new(dropdown: &'a HistoryDropdown, theme: &'a Theme) -> Self {
        Self { dropdown, theme }
    }
}

impl Widget for HistoryPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(format!(" History ({}) ", self.dropdown.items.len()))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        if self.dropdown.items.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                " No calculations yet",
                Style::default().fg(colors.text_dim()),
            )))
            .render(inner, buf);
            return;
        }

        // Keep the highlighted row in view
        let visible = inner.height as usize;
        let first = self
            .dropdown
            .highlighted
            .saturating_sub(visible.saturating_sub(1));

        let lines: Vec<Line> = self
            .dropdown
            .items
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, item)| {
                if i == self.dropdown.highlighted {
                    Line::from(Span::styled(
                        format!(" > {item}"),
                        Style::default()
                            .fg(colors.accent())
                            .bg(colors.selection_bg())
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("   {item}"),
                        Style::default().fg(colors.fg()),
                    ))
                }
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
