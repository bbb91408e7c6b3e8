use crate::calc::editor::Operator;

pub const BACKSPACE_GLYPH: &str = "⌫";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Digit(u8),
    Decimal,
    Operator(Operator),
    ParenOpen,
    ParenClose,
    Clear,
    Equals,
    ToggleSign,
    Backspace,
    Percent,
}

/// Keypad grid, row-major. `None` cells are empty.
pub const KEYPAD_COLUMNS: usize = 4;
pub const KEYPAD: [[Option<Button>; KEYPAD_COLUMNS]; 6] = [
    [
        Some(Button::Clear),
        Some(Button::ParenOpen),
        Some(Button::ParenClose),
        Some(Button::Backspace),
    ],
    [
        Some(Button::ToggleSign),
        Some(Button::Percent),
        Some(Button::Operator(Operator::Power)),
        Some(Button::Operator(Operator::Divide)),
    ],
    [
        Some(Button::Digit(7)),
        Some(Button::Digit(8)),
        Some(Button::Digit(9)),
        Some(Button::Operator(Operator::Multiply)),
    ],
    [
        Some(Button::Digit(4)),
        Some(Button::Digit(5)),
        Some(Button::Digit(6)),
        Some(Button::Operator(Operator::Subtract)),
    ],
    [
        Some(Button::Digit(1)),
        Some(Button::Digit(2)),
        Some(Button::Digit(3)),
        Some(Button::Operator(Operator::Add)),
    ],
    [
        Some(Button::Digit(0)),
        Some(Button::Decimal),
        Some(Button::Equals),
        None,
    ],
];

impl Button {
    /// Glyph printed on the key. Pressing a key sends exactly this label.
    pub fn label(self) -> String {
        match self {
            Button::Digit(d) => d.to_string(),
            Button::Decimal => ".".to_string(),
            Button::Operator(op) => op.glyph().to_string(),
            Button::ParenOpen => "(".to_string(),
            Button::ParenClose => ")".to_string(),
            Button::Clear => "AC".to_string(),
            Button::Equals => "=".to_string(),
            Button::ToggleSign => "+/-".to_string(),
            Button::Backspace => BACKSPACE_GLYPH.to_string(),
            Button::Percent => "%".to_string(),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        if let Ok(d) = label.parse::<u8>() {
            return (d <= 9 && label.len() == 1).then_some(Button::Digit(d));
        }
        if let Some(op) = Operator::from_glyph(label) {
            return Some(Button::Operator(op));
        }
        match label {
            "." => Some(Button::Decimal),
            "(" => Some(Button::ParenOpen),
            ")" => Some(Button::ParenClose),
            "AC" => Some(Button::Clear),
            "=" => Some(Button::Equals),
            "+/-" => Some(Button::ToggleSign),
            BACKSPACE_GLYPH => Some(Button::Backspace),
            "%" => Some(Button::Percent),
            _ => None,
        }
    }

    pub fn is_operator(self) -> bool {
        matches!(self, Button::Operator(_))
    }

    /// Clear, equals and the editing keys, rendered in the action color.
    pub fn is_action(self) -> bool {
        matches!(
            self,
            Button::Clear | Button::Equals | Button::Backspace | Button::ToggleSign
        )
    }

    /// Row and column of this button in [`KEYPAD`].
    pub fn position(self) -> Option<(usize, usize)> {
        KEYPAD.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|cell| *cell == Some(self))
                .map(|col| (row, col))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_round_trips() {
        for button in KEYPAD.iter().flatten().flatten() {
            assert_eq!(Button::from_label(&button.label()), Some(*button));
        }
    }

    #[test]
    fn keypad_has_every_glyph_once() {
        let buttons: Vec<Button> = KEYPAD.iter().flatten().flatten().copied().collect();
        assert_eq!(buttons.len(), 23);
        for (i, a) in buttons.iter().enumerate() {
            assert!(!buttons[i + 1..].contains(a), "{a:?} appears twice");
        }
    }

    #[test]
    fn keyboard_aliases() {
        assert_eq!(
            Button::from_label("*"),
            Some(Button::Operator(Operator::Multiply))
        );
        assert_eq!(
            Button::from_label("/"),
            Some(Button::Operator(Operator::Divide))
        );
        assert_eq!(Button::from_label("12"), None);
        assert_eq!(Button::from_label("?"), None);
    }

    #[test]
    fn positions() {
        assert_eq!(Button::Clear.position(), Some((0, 0)));
        assert_eq!(Button::Equals.position(), Some((5, 2)));
        assert_eq!(Button::Digit(5).position(), Some((3, 1)));
    }
}
