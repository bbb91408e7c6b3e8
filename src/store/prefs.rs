use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

type Entries = BTreeMap<String, String>;

/// A named string-to-string preference namespace backed by one JSON file.
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    /// Open (or lazily create) the namespace `name` under `base_dir`.
    pub fn open(base_dir: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(base_dir)
            .with_context(|| format!("creating preferences dir {}", base_dir.display()))?;
        Ok(Self {
            path: base_dir.join(format!("{name}.json")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(entries)
    }

    fn write_entries(&self, entries: &Entries) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(entries)?;
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    /// `Ok(None)` when the key (or the whole file) is absent.
    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    pub fn put_string(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries = self.read_entries().unwrap_or_else(|err| {
            log::warn!("discarding unreadable preferences: {err:#}");
            Entries::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_prefs() -> (TempDir, Preferences) {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::open(dir.path(), "TestPrefs").unwrap();
        (dir, prefs)
    }

    #[test]
    fn absent_file_reads_as_none() {
        let (_dir, prefs) = make_prefs();
        assert!(!prefs.path().exists());
        assert_eq!(prefs.get_string("history").unwrap(), None);
    }

    #[test]
    fn put_then_get() {
        let (_dir, prefs) = make_prefs();
        prefs.put_string("history", "[\"1 + 1 = 2\"]").unwrap();
        prefs.put_string("other", "x").unwrap();
        assert_eq!(
            prefs.get_string("history").unwrap().as_deref(),
            Some("[\"1 + 1 = 2\"]")
        );
        assert_eq!(prefs.get_string("other").unwrap().as_deref(), Some("x"));
        assert!(prefs.path().ends_with("TestPrefs.json"));
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let (dir, prefs) = make_prefs();
        prefs.put_string("k", "v").unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn corrupt_file_errors_on_read_and_is_replaced_on_write() {
        let (_dir, prefs) = make_prefs();
        fs::write(prefs.path(), "{not json").unwrap();
        assert!(prefs.get_string("k").is_err());

        prefs.put_string("k", "v").unwrap();
        assert_eq!(prefs.get_string("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn remove_key() {
        let (_dir, prefs) = make_prefs();
        prefs.put_string("a", "1").unwrap();
        prefs.put_string("b", "2").unwrap();
        prefs.remove("a").unwrap();
        assert_eq!(prefs.get_string("a").unwrap(), None);
        assert_eq!(prefs.get_string("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn write_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("gone");
        let prefs = Preferences::open(&base, "TestPrefs").unwrap();
        fs::remove_dir_all(&base).unwrap();
        assert!(prefs.put_string("k", "v").is_err());
    }
}
