use std::sync::LazyLock;

use regex::Regex;

static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+\.?\d*)$").expect("trailing number pattern"));
static PAREN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((-?\d+\.?\d*)$").expect("paren number pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// Glyph as it appears in the expression text.
    pub fn glyph(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "x",
            Operator::Divide => "÷",
            Operator::Power => "^",
        }
    }

    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "x" | "×" | "*" => Some(Operator::Multiply),
            "÷" | "/" => Some(Operator::Divide),
            "^" => Some(Operator::Power),
            _ => None,
        }
    }
}

/// The live expression buffer.
///
/// Every edit returns a new `Expression`; the receiver is never mutated.
/// `cursor` is a char index and always lies in `0..=text.chars().count()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expression {
    text: String,
    cursor: usize,
}

/// True if `value` can be inserted as a plain number.
pub fn is_numeric_token(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(|v| v.is_finite())
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole buffer, cursor at the end.
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn last_char(&self) -> Option<char> {
        self.text.chars().last()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn appended(&self, suffix: &str) -> Self {
        Self::from_text(&format!("{}{suffix}", self.text))
    }

    fn inserted_at_cursor(&self, value: &str) -> Self {
        let byte_offset = self.char_to_byte(self.cursor);
        let mut text = self.text.clone();
        text.insert_str(byte_offset, value);
        Self {
            text,
            cursor: self.cursor + value.chars().count(),
        }
    }

    /// Same text, cursor clamped to the buffer.
    pub fn with_cursor(&self, cursor: usize) -> Self {
        Self {
            text: self.text.clone(),
            cursor: cursor.min(self.len()),
        }
    }

    pub fn move_left(&self) -> Self {
        self.with_cursor(self.cursor.saturating_sub(1))
    }

    pub fn move_right(&self) -> Self {
        self.with_cursor(self.cursor + 1)
    }

    pub fn move_home(&self) -> Self {
        self.with_cursor(0)
    }

    pub fn move_end(&self) -> Self {
        self.with_cursor(self.len())
    }

    pub fn insert_token(&self, value: &str) -> Self {
        if !is_numeric_token(value) {
            return self.clone();
        }
        self.inserted_at_cursor(value)
    }

    /// Appends `.` to the tail if the current operand has none yet.
    /// Acts on the end of the text regardless of the cursor.
    pub fn insert_decimal(&self) -> Self {
        let operand = self.text.split(' ').next_back().unwrap_or("");
        if operand.contains('.') {
            return self.clone();
        }
        self.appended(".")
    }

    pub fn insert_operator(&self, op: Operator) -> Self {
        let accepts_operator = self
            .last_char()
            .is_some_and(|c| c.is_ascii_digit() || c == ')' || c == '%');
        if !accepts_operator {
            return self.clone();
        }
        self.inserted_at_cursor(&format!(" {} ", op.glyph()))
    }

    pub fn insert_paren_open(&self) -> Self {
        self.appended("(")
    }

    pub fn insert_paren_close(&self) -> Self {
        if self.last_char().is_some_and(|c| c.is_ascii_digit()) {
            self.appended(")")
        } else {
            self.clone()
        }
    }

    pub fn toggle_percent(&self) -> Self {
        if self.last_char().is_some_and(|c| c.is_ascii_digit()) {
            self.appended("%")
        } else {
            self.clone()
        }
    }

    /// Flip the sign of the number at the end of the last operand.
    pub fn toggle_sign(&self) -> Self {
        if self.text.is_empty() {
            return self.clone();
        }
        let mut parts: Vec<&str> = self.text.split(' ').collect();
        let Some(last) = parts.pop() else {
            return self.clone();
        };

        // Group 1 is the number; for the paren form it excludes the '('.
        let number = PAREN_NUMBER
            .captures(last)
            .or_else(|| TRAILING_NUMBER.captures(last))
            .and_then(|caps| caps.get(1));
        let Some(number) = number else {
            return self.clone();
        };

        let digits = number.as_str();
        let toggled = match digits.strip_prefix('-') {
            Some(unsigned) => unsigned.to_string(),
            None => format!("-{digits}"),
        };
        let rewritten = format!(
            "{}{}{}",
            &last[..number.start()],
            toggled,
            &last[number.end()..]
        );

        let mut text = parts.join(" ");
        if !parts.is_empty() {
            text.push(' ');
        }
        text.push_str(&rewritten);
        Self::from_text(&text)
    }

    pub fn backspace(&self) -> Self {
        if self.cursor == 0 {
            return self.clone();
        }
        let start = self.char_to_byte(self.cursor - 1);
        let end = self.char_to_byte(self.cursor);
        let mut text = self.text.clone();
        text.replace_range(start..end, "");
        Self {
            text,
            cursor: self.cursor - 1,
        }
    }

    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When the cursor is at the end of the text, cursor_char is None.
    pub fn split_at_cursor(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(steps: &[&str]) -> Expression {
        steps.iter().fold(Expression::new(), |expr, step| {
            match Operator::from_glyph(step) {
                Some(op) => expr.insert_operator(op),
                None => expr.insert_token(step),
            }
        })
    }

    #[test]
    fn digits_insert_at_cursor() {
        let expr = Expression::from_text("13").with_cursor(1);
        let expr = expr.insert_token("2");
        assert_eq!(expr.text(), "123");
        assert_eq!(expr.cursor(), 2);

        let expr = expr.move_home().insert_token("45");
        assert_eq!(expr.text(), "45123");
        assert_eq!(expr.cursor(), 2);
    }

    #[test]
    fn non_numeric_token_is_ignored() {
        let expr = Expression::from_text("1");
        assert_eq!(expr.insert_token("."), expr);
        assert_eq!(expr.insert_token("abc"), expr);
        assert_eq!(expr.insert_token("inf"), expr);
    }

    #[test]
    fn numeric_token_classification() {
        assert!(is_numeric_token("7"));
        assert!(is_numeric_token("42"));
        assert!(is_numeric_token("3.5"));
        assert!(!is_numeric_token("."));
        assert!(!is_numeric_token("+"));
        assert!(!is_numeric_token("AC"));
        assert!(!is_numeric_token("NaN"));
    }

    #[test]
    fn operator_on_empty_is_noop() {
        let expr = Expression::new().insert_operator(Operator::Add);
        assert_eq!(expr.text(), "");
        assert_eq!(expr.cursor(), 0);
    }

    #[test]
    fn operator_is_padded_and_advances_cursor() {
        let expr = typed(&["12", "x"]);
        assert_eq!(expr.text(), "12 x ");
        assert_eq!(expr.cursor(), 5);

        let expr = typed(&["8", "÷"]);
        assert_eq!(expr.text(), "8 ÷ ");
        assert_eq!(expr.cursor(), 4);
    }

    #[test]
    fn operator_guard_checks_last_char() {
        let after_op = typed(&["1", "+"]);
        assert_eq!(after_op.insert_operator(Operator::Subtract), after_op);

        let after_paren = Expression::from_text("(2)");
        assert_eq!(
            after_paren.insert_operator(Operator::Power).text(),
            "(2) ^ "
        );

        let after_percent = Expression::from_text("5%");
        assert_eq!(after_percent.insert_operator(Operator::Add).text(), "5% + ");

        let after_open = Expression::from_text("(");
        assert_eq!(after_open.insert_operator(Operator::Add), after_open);
    }

    #[test]
    fn operator_inserts_at_cursor_but_guards_on_tail() {
        let expr = Expression::from_text("12").with_cursor(1);
        let expr = expr.insert_operator(Operator::Add);
        assert_eq!(expr.text(), "1 + 2");
        assert_eq!(expr.cursor(), 4);
    }

    #[test]
    fn decimal_only_once_per_operand() {
        let expr = Expression::from_text("3").insert_decimal();
        assert_eq!(expr.text(), "3.");
        assert_eq!(expr.insert_decimal().text(), "3.");

        let expr = Expression::from_text("3.5 + 2").insert_decimal();
        assert_eq!(expr.text(), "3.5 + 2.");
    }

    #[test]
    fn decimal_appends_at_end_regardless_of_cursor() {
        let expr = Expression::from_text("12 + 34").with_cursor(1);
        let expr = expr.insert_decimal();
        assert_eq!(expr.text(), "12 + 34.");
        assert_eq!(expr.cursor(), 8);
    }

    #[test]
    fn open_paren_always_appends() {
        let expr = Expression::new().insert_paren_open();
        assert_eq!(expr.text(), "(");
        let expr = Expression::from_text("2 + 3").with_cursor(0).insert_paren_open();
        assert_eq!(expr.text(), "2 + 3(");
        assert_eq!(expr.cursor(), 6);
    }

    #[test]
    fn close_paren_requires_digit() {
        assert_eq!(Expression::new().insert_paren_close().text(), "");
        assert_eq!(Expression::from_text("(2").insert_paren_close().text(), "(2)");
        assert_eq!(
            Expression::from_text("(2 + ").insert_paren_close().text(),
            "(2 + "
        );
    }

    #[test]
    fn percent_requires_digit() {
        assert_eq!(Expression::from_text("5").toggle_percent().text(), "5%");
        assert_eq!(Expression::from_text("5%").toggle_percent().text(), "5%");
        assert_eq!(Expression::new().toggle_percent().text(), "");
    }

    #[test]
    fn sign_toggle_round_trip() {
        let expr = Expression::from_text("3 + 4").toggle_sign();
        assert_eq!(expr.text(), "3 + -4");
        let expr = expr.toggle_sign();
        assert_eq!(expr.text(), "3 + 4");
    }

    #[test]
    fn sign_toggle_single_number_and_decimals() {
        assert_eq!(Expression::from_text("7").toggle_sign().text(), "-7");
        assert_eq!(Expression::from_text("2.5").toggle_sign().text(), "-2.5");
        assert_eq!(Expression::from_text("2.").toggle_sign().text(), "-2.");
    }

    #[test]
    fn sign_toggle_after_open_paren() {
        let expr = Expression::from_text("2 x (5").toggle_sign();
        assert_eq!(expr.text(), "2 x (-5");
        assert_eq!(expr.toggle_sign().text(), "2 x (5");
    }

    #[test]
    fn sign_toggle_rewrites_only_the_trailing_number() {
        let expr = Expression::from_text("5(5").toggle_sign();
        assert_eq!(expr.text(), "5(-5");
    }

    #[test]
    fn sign_toggle_without_number_is_noop() {
        let expr = Expression::from_text("3 + ");
        assert_eq!(expr.toggle_sign(), expr);
        assert_eq!(Expression::new().toggle_sign(), Expression::new());
        let closed = Expression::from_text("(3)");
        assert_eq!(closed.toggle_sign(), closed);
    }

    #[test]
    fn backspace_at_boundaries() {
        let expr = Expression::from_text("12");
        let expr = expr.backspace();
        assert_eq!(expr.text(), "1");
        assert_eq!(expr.cursor(), 1);
        let expr = expr.backspace().backspace();
        assert_eq!(expr.text(), "");
        assert_eq!(expr.cursor(), 0);
    }

    #[test]
    fn backspace_mid_text_and_multibyte() {
        let expr = Expression::from_text("123").with_cursor(2).backspace();
        assert_eq!(expr.text(), "13");
        assert_eq!(expr.cursor(), 1);

        let expr = Expression::from_text("8 ÷").backspace();
        assert_eq!(expr.text(), "8 ");
        assert_eq!(expr.cursor(), 2);
    }

    #[test]
    fn clear_resets() {
        let expr = Expression::from_text("1 + 2").clear();
        assert!(expr.is_empty());
        assert_eq!(expr.cursor(), 0);
    }

    #[test]
    fn cursor_is_clamped() {
        let expr = Expression::from_text("ab").with_cursor(10);
        assert_eq!(expr.cursor(), 2);
        assert_eq!(expr.move_right().cursor(), 2);
        assert_eq!(expr.move_home().move_left().cursor(), 0);
    }

    #[test]
    fn edits_do_not_mutate_receiver() {
        let original = Expression::from_text("3 + 4");
        let _ = original.toggle_sign();
        let _ = original.backspace();
        assert_eq!(original.text(), "3 + 4");
    }

    #[test]
    fn split_at_cursor_parts() {
        let expr = Expression::from_text("1÷2").with_cursor(1);
        assert_eq!(expr.split_at_cursor(), ("1", Some('÷'), "2"));
        let expr = expr.move_end();
        assert_eq!(expr.split_at_cursor(), ("1÷2", None, ""));
    }
}
