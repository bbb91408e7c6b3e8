pub mod history;
pub mod prefs;
