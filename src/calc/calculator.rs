use crate::calc::button::Button;
use crate::calc::editor::{self, Expression};
use crate::calc::evaluate::{self, SYNTAX_ERROR};

/// What the result line currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResultLine {
    #[default]
    Empty,
    Value(String),
    SyntaxError,
}

impl ResultLine {
    pub fn text(&self) -> &str {
        match self {
            ResultLine::Empty => "",
            ResultLine::Value(v) => v,
            ResultLine::SyntaxError => SYNTAX_ERROR,
        }
    }
}

/// A successful `=`: the expression as typed and its formatted result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub expression: String,
    pub result: String,
}

#[derive(Clone, Debug, Default)]
pub struct Calculator {
    pub expression: Expression,
    pub result: ResultLine,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a raw key label the way the keypad sends it. Any numeric
    /// label is inserted as-is, so multi-digit tokens work too.
    pub fn handle_label(&mut self, label: &str) -> Option<Evaluation> {
        if editor::is_numeric_token(label) {
            self.expression = self.expression.insert_token(label);
            return None;
        }
        Button::from_label(label).and_then(|button| self.press(button))
    }

    /// Apply one button press. Returns the evaluation when `=` succeeds so the
    /// caller can record it.
    pub fn press(&mut self, button: Button) -> Option<Evaluation> {
        let expr = &self.expression;
        self.expression = match button {
            Button::Digit(d) => expr.insert_token(&d.to_string()),
            Button::Decimal => expr.insert_decimal(),
            Button::Operator(op) => expr.insert_operator(op),
            Button::ParenOpen => expr.insert_paren_open(),
            Button::ParenClose => expr.insert_paren_close(),
            Button::Percent => expr.toggle_percent(),
            Button::ToggleSign => expr.toggle_sign(),
            Button::Backspace => expr.backspace(),
            Button::Clear => {
                self.result = ResultLine::Empty;
                expr.clear()
            }
            Button::Equals => return self.evaluate(),
        };
        None
    }

    fn evaluate(&mut self) -> Option<Evaluation> {
        if self.expression.is_empty() {
            return None;
        }
        let typed = self.expression.text().to_string();
        match evaluate::evaluate(&typed) {
            Ok(value) => {
                let formatted = evaluate::format_result(value);
                log::info!("{typed} = {formatted}");
                self.expression = Expression::from_text(&formatted);
                self.result = ResultLine::Value(formatted.clone());
                Some(Evaluation {
                    expression: typed,
                    result: formatted,
                })
            }
            Err(err) => {
                log::debug!("evaluation of {typed:?} failed: {err}");
                self.result = ResultLine::SyntaxError;
                None
            }
        }
    }

    /// Load a past expression and its result back into the editor.
    pub fn restore(&mut self, expression: &str, result: &str) {
        self.expression = Expression::from_text(expression);
        self.result = if result.is_empty() {
            ResultLine::Empty
        } else {
            ResultLine::Value(result.to_string())
        };
    }

    pub fn is_error(&self) -> bool {
        self.result == ResultLine::SyntaxError
    }
}
