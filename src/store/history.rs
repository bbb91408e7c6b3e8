use std::path::Path;

use anyhow::Result;

use crate::store::prefs::Preferences;

pub const PREFS_NAMESPACE: &str = "CalculatorPrefs";
pub const HISTORY_KEY: &str = "history";
pub const DEFAULT_CAPACITY: usize = 23;

const SEPARATOR: &str = " = ";

/// One past evaluation. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRecord {
    expression: String,
    result: String,
}

impl HistoryRecord {
    pub fn new(expression: &str, result: &str) -> Self {
        Self {
            expression: expression.to_string(),
            result: result.to_string(),
        }
    }

    /// Split a display string on the first `" = "`. Without a separator the
    /// whole string is the expression and the result is empty.
    pub fn parse(display: &str) -> Self {
        match display.split_once(SEPARATOR) {
            Some((expression, result)) => Self::new(expression, result),
            None => Self::new(display, ""),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn display(&self) -> String {
        format!("{}{SEPARATOR}{}", self.expression, self.result)
    }
}

/// Most-recent-first log of evaluations, capped at `capacity` entries.
///
/// Storage failures never escape: they are logged and the in-memory log stays
/// authoritative for the rest of the session.
pub struct HistoryStore {
    entries: Vec<String>,
    capacity: usize,
    prefs: Option<Preferences>,
}

impl HistoryStore {
    /// Open the persistent log under `base_dir` and load it.
    pub fn open(base_dir: &Path, capacity: usize) -> Result<Self> {
        let prefs = Preferences::open(base_dir, PREFS_NAMESPACE)?;
        let mut store = Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            prefs: Some(prefs),
        };
        store.load();
        Ok(store)
    }

    /// A log that lives only as long as the process.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            prefs: None,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_persistent(&self) -> bool {
        self.prefs.is_some()
    }

    pub fn record(&mut self, expression: &str, result: &str) {
        let display = HistoryRecord::new(expression, result).display();
        log::debug!("saving to history: {display}");

        self.entries.insert(0, display);
        self.entries.truncate(self.capacity);

        match self.persist() {
            Ok(()) => self.load(),
            Err(err) => log::error!("failed to save history: {err:#}"),
        }
    }

    /// Replace the in-memory log with what storage holds. An absent key means
    /// an empty log; unreadable data leaves the log unchanged.
    pub fn load(&mut self) {
        let Some(prefs) = &self.prefs else {
            return;
        };
        let raw = match prefs.get_string(HISTORY_KEY) {
            Ok(raw) => raw.unwrap_or_else(|| "[]".to_string()),
            Err(err) => {
                log::error!("failed to load history: {err:#}");
                return;
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(self.capacity);
                self.entries = entries;
                log::debug!("loaded {} history entries", self.entries.len());
            }
            Err(err) => log::error!("failed to load history: {err}"),
        }
    }

    /// Parse an entry for recall. Never writes.
    pub fn select_entry(&self, display: &str) -> HistoryRecord {
        HistoryRecord::parse(display)
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        if let Some(prefs) = &self.prefs
            && let Err(err) = prefs.remove(HISTORY_KEY)
        {
            log::error!("failed to clear history: {err:#}");
        }
    }

    fn persist(&self) -> Result<()> {
        let Some(prefs) = &self.prefs else {
            return Ok(());
        };
        let json = serde_json::to_string(&self.entries)?;
        prefs.put_string(HISTORY_KEY, &json)
    }
}
