use std::path::Path;

use crate::calc::button::Button;
use crate::calc::calculator::{Calculator, Evaluation};
use crate::config::Config;
use crate::store::history::HistoryStore;
use crate::ui::components::history_dropdown::HistoryDropdown;
use crate::ui::components::keypad::KeypadFocus;
use crate::ui::theme::Theme;

pub struct App {
    pub calculator: Calculator,
    pub history: HistoryStore,
    pub dropdown: HistoryDropdown,
    pub keypad_focus: KeypadFocus,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, data_dir: &Path) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let history = HistoryStore::open(data_dir, config.history_limit).unwrap_or_else(|err| {
            log::warn!("history will not be saved this session: {err:#}");
            HistoryStore::in_memory(config.history_limit)
        });

        let mut dropdown = HistoryDropdown::default();
        dropdown.refresh(history.entries());

        Self {
            calculator: Calculator::new(),
            history,
            dropdown,
            keypad_focus: KeypadFocus::default(),
            theme,
            config,
            should_quit: false,
        }
    }

    pub fn press(&mut self, button: Button) {
        if let Some(evaluation) = self.calculator.press(button) {
            self.record(evaluation);
        }
    }

    /// Feed a typed key label (digit, operator glyph, ...) to the calculator.
    pub fn type_label(&mut self, label: &str) {
        if let Some(evaluation) = self.calculator.handle_label(label) {
            self.record(evaluation);
        }
    }

    pub fn press_focused(&mut self) {
        if let Some(button) = self.keypad_focus.button() {
            self.press(button);
        }
    }

    /// Press a keypad button by pointer, moving keyboard focus onto it.
    pub fn click(&mut self, button: Button) {
        if let Some((row, col)) = button.position() {
            self.keypad_focus = KeypadFocus { row, col };
        }
        self.press(button);
    }

    fn record(&mut self, evaluation: Evaluation) {
        self.history
            .record(&evaluation.expression, &evaluation.result);
        self.dropdown.refresh(self.history.entries());
    }

    pub fn cursor_left(&mut self) {
        self.calculator.expression = self.calculator.expression.move_left();
    }

    pub fn cursor_right(&mut self) {
        self.calculator.expression = self.calculator.expression.move_right();
    }

    pub fn cursor_home(&mut self) {
        self.calculator.expression = self.calculator.expression.move_home();
    }

    pub fn cursor_end(&mut self) {
        self.calculator.expression = self.calculator.expression.move_end();
    }

    pub fn open_history(&mut self) {
        self.dropdown.open = true;
    }

    pub fn close_history(&mut self) {
        self.dropdown.open = false;
    }

    /// Restore the highlighted entry into the editor and close the dropdown.
    pub fn recall_highlighted(&mut self) {
        if let Some(entry) = self.dropdown.confirm() {
            let record = self.history.select_entry(&entry);
            self.calculator
                .restore(record.expression(), record.result());
            self.close_history();
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear_all();
        self.dropdown.refresh(self.history.entries());
    }

    pub fn cycle_theme(&mut self) {
        let Some(name) = Theme::next_name(&self.config.theme) else {
            return;
        };
        if let Some(new_theme) = Theme::load(&name) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.config.theme = name;
            if let Err(err) = self.config.save() {
                log::warn!("failed to save config: {err:#}");
            }
        }
    }
}
