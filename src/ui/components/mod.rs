pub mod display;
pub mod history_dropdown;
pub mod keypad;
