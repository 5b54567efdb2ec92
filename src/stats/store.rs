use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::tally::{variant_key, Tally, TOTAL_KEY};
use crate::error::StatsError;
use crate::game::GameOutcome;

/// Key-value storage for outcome tallies.
///
/// Loading never fails: missing or corrupt entries read as zeros.
pub trait TallyStore {
    fn load(&self, key: &str) -> Tally;

    fn save(&mut self, key: &str, tally: &Tally) -> Result<(), StatsError>;

    /// Save several tallies together. Stores that can write them in one step
    /// should, so related keys never disagree after a failed write.
    fn save_many(&mut self, entries: &[(String, Tally)]) -> Result<(), StatsError> {
        for (key, tally) in entries {
            self.save(key, tally)?;
        }
        Ok(())
    }
}

/// Increment the variant tally and the aggregate tally for one finished game.
pub fn record_outcome<S: TallyStore + ?Sized>(
    store: &mut S,
    variant: &str,
    outcome: GameOutcome,
) -> Result<(), StatsError> {
    let entries: Vec<(String, Tally)> = [variant_key(variant), TOTAL_KEY.to_string()]
        .into_iter()
        .map(|key| {
            let mut tally = store.load(&key);
            tally.record(outcome);
            (key, tally)
        })
        .collect();
    store.save_many(&entries)
}

/// In-memory store holding serialized tallies, like a browser's string storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryTallyStore {
    entries: HashMap<String, String>,
}

impl MemoryTallyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw string under `key`, bypassing serialization.
    pub fn insert_raw(&mut self, key: &str, raw: &str) {
        self.entries.insert(key.to_string(), raw.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl TallyStore for MemoryTallyStore {
    fn load(&self, key: &str) -> Tally {
        self.entries
            .get(key)
            .map(|raw| Tally::parse(raw))
            .unwrap_or_default()
    }

    fn save(&mut self, key: &str, tally: &Tally) -> Result<(), StatsError> {
        let raw = serde_json::to_string(tally)?;
        self.entries.insert(key.to_string(), raw);
        Ok(())
    }
}

/// Tallies kept in a single JSON object file, one entry per key.
#[derive(Debug, Clone)]
pub struct JsonFileTallyStore {
    path: PathBuf,
}

impl JsonFileTallyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileTallyStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. A missing or unreadable file is an empty map.
    fn read_entries(&self) -> Map<String, Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "tally file unreadable, using zeros");
                }
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "tally file corrupt, using zeros");
                Map::new()
            }
        }
    }

    fn io_err(&self, source: std::io::Error) -> StatsError {
        StatsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TallyStore for JsonFileTallyStore {
    fn load(&self, key: &str) -> Tally {
        self.read_entries()
            .remove(key)
            .map(Tally::from_value)
            .unwrap_or_default()
    }

    fn save(&mut self, key: &str, tally: &Tally) -> Result<(), StatsError> {
        self.save_many(&[(key.to_string(), *tally)])
    }

    /// One read-modify-write of the whole file for all entries.
    fn save_many(&mut self, updates: &[(String, Tally)]) -> Result<(), StatsError> {
        let mut entries = self.read_entries();
        for (key, tally) in updates {
            entries.insert(key.clone(), serde_json::to_value(tally)?);
        }
        let json = serde_json::to_string_pretty(&Value::Object(entries))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        // Write a sibling temp file, then rename it into place.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;

        debug!(?updates, path = %self.path.display(), "tallies saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Side;

    #[test]
    fn test_memory_store_defaults_and_saves() {
        let mut store = MemoryTallyStore::new();
        assert_eq!(store.load("missing"), Tally::default());

        let tally = Tally { human: 1, opponent: 2, draws: 3 };
        store.save("k", &tally).unwrap();
        assert_eq!(store.load("k"), tally);
        assert_eq!(store.raw("k"), Some(r#"{"human":1,"opponent":2,"draws":3}"#));
    }

    #[test]
    fn test_memory_store_corrupt_entry_reads_zero() {
        let mut store = MemoryTallyStore::new();
        store.insert_raw("k", "{oops");
        assert_eq!(store.load("k"), Tally::default());
    }

    #[test]
    fn test_record_outcome_updates_both_keys() {
        let mut store = MemoryTallyStore::new();
        record_outcome(&mut store, "cnn", GameOutcome::Winner(Side::Human)).unwrap();
        record_outcome(&mut store, "transformer", GameOutcome::Draw).unwrap();
        record_outcome(&mut store, "cnn", GameOutcome::Winner(Side::Opponent)).unwrap();

        assert_eq!(store.load(&variant_key("cnn")), Tally { human: 1, opponent: 1, draws: 0 });
        assert_eq!(
            store.load(&variant_key("transformer")),
            Tally { human: 0, opponent: 0, draws: 1 }
        );
        assert_eq!(store.load(TOTAL_KEY), Tally { human: 1, opponent: 1, draws: 1 });
    }

    #[test]
    fn test_record_outcome_over_corrupt_data_starts_from_zero() {
        let mut store = MemoryTallyStore::new();
        store.insert_raw(TOTAL_KEY, "garbage");
        record_outcome(&mut store, "cnn", GameOutcome::Draw).unwrap();
        assert_eq!(store.load(TOTAL_KEY), Tally { human: 0, opponent: 0, draws: 1 });
    }

    /// Counts how tallies reach the underlying store.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryTallyStore,
        batches: Vec<usize>,
    }

    impl TallyStore for CountingStore {
        fn load(&self, key: &str) -> Tally {
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, tally: &Tally) -> Result<(), StatsError> {
            self.batches.push(1);
            self.inner.save(key, tally)
        }

        fn save_many(&mut self, entries: &[(String, Tally)]) -> Result<(), StatsError> {
            self.batches.push(entries.len());
            self.inner.save_many(entries)
        }
    }

    #[test]
    fn test_record_outcome_saves_both_keys_in_one_batch() {
        let mut store = CountingStore::default();
        record_outcome(&mut store, "cnn", GameOutcome::Draw).unwrap();
        assert_eq!(store.batches, vec![2]);
        assert_eq!(store.load(&variant_key("cnn")).draws, 1);
        assert_eq!(store.load(TOTAL_KEY).draws, 1);
    }

    #[test]
    fn test_file_store_failed_write_keeps_keys_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let mut store = JsonFileTallyStore::new(&path);
        record_outcome(&mut store, "cnn", GameOutcome::Winner(Side::Human)).unwrap();

        // A directory where the temp file should go makes the write fail.
        fs::create_dir(dir.path().join("stats.json.tmp")).unwrap();
        assert!(record_outcome(&mut store, "cnn", GameOutcome::Winner(Side::Opponent)).is_err());

        let reopened = JsonFileTallyStore::new(&path);
        assert_eq!(reopened.load(&variant_key("cnn")), Tally { human: 1, opponent: 0, draws: 0 });
        assert_eq!(reopened.load(TOTAL_KEY), Tally { human: 1, opponent: 0, draws: 0 });
    }

    #[test]
    fn test_file_store_missing_file_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileTallyStore::new(dir.path().join("stats.json"));
        assert_eq!(store.load(TOTAL_KEY), Tally::default());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.json");

        let mut store = JsonFileTallyStore::new(&path);
        record_outcome(&mut store, "cnn", GameOutcome::Winner(Side::Human)).unwrap();
        record_outcome(&mut store, "cnn", GameOutcome::Winner(Side::Human)).unwrap();

        let reopened = JsonFileTallyStore::new(&path);
        assert_eq!(reopened.load(&variant_key("cnn")), Tally { human: 2, opponent: 0, draws: 0 });
        assert_eq!(reopened.load(TOTAL_KEY).human, 2);
        assert!(!dir.path().join("nested").join("stats.json.tmp").exists());
    }

    #[test]
    fn test_file_store_corrupt_file_reads_zero_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, "this is not json").unwrap();

        let mut store = JsonFileTallyStore::new(&path);
        assert_eq!(store.load(TOTAL_KEY), Tally::default());

        record_outcome(&mut store, "cnn", GameOutcome::Draw).unwrap();
        assert_eq!(store.load(TOTAL_KEY).draws, 1);
    }

    #[test]
    fn test_file_store_corrupt_entry_keeps_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(
            &path,
            r#"{"connect4:stats:cnn": "bad", "connect4:stats:total": {"user": 4, "ai": 1, "draws": 0}}"#,
        )
        .unwrap();

        let store = JsonFileTallyStore::new(&path);
        assert_eq!(store.load(&variant_key("cnn")), Tally::default());
        assert_eq!(store.load(TOTAL_KEY), Tally { human: 4, opponent: 1, draws: 0 });
    }
}
