pub mod button;
pub mod calculator;
pub mod editor;
pub mod evaluate;
