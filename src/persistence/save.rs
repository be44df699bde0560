//! Save blob model and the store that owns it
//!
//! One JSON blob under one key holds coins, profile, settings and per-category
//! progress. The whole blob is rewritten on every save.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::migration;
use crate::consts::*;
use crate::platform::{KeyValueStore, StorageError};
use crate::settings::Settings;

/// Per-category progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    #[serde(default, deserialize_with = "migration::nullable")]
    pub(crate) category_id: String,
    /// Every question ever presented
    #[serde(default, alias = "seenList", deserialize_with = "migration::nullable")]
    pub(crate) seen_question_ids: BTreeSet<String>,
    /// Every question ever answered correctly
    #[serde(default, alias = "correctList", deserialize_with = "migration::nullable")]
    pub(crate) correct_question_ids: BTreeSet<String>,
    /// Highest playable level (always >= 1)
    #[serde(
        default = "migration::first_level",
        deserialize_with = "migration::watermark"
    )]
    pub(crate) unlocked_level_max: u32,
}

impl CategoryProgress {
    pub fn new(category_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            seen_question_ids: BTreeSet::new(),
            correct_question_ids: BTreeSet::new(),
            unlocked_level_max: FIRST_LEVEL,
        }
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn seen(&self) -> &BTreeSet<String> {
        &self.seen_question_ids
    }

    pub fn correct(&self) -> &BTreeSet<String> {
        &self.correct_question_ids
    }

    pub fn has_seen(&self, question_id: &str) -> bool {
        self.seen_question_ids.contains(question_id)
    }

    pub fn is_correct(&self, question_id: &str) -> bool {
        self.correct_question_ids.contains(question_id)
    }

    pub fn unlocked_level_max(&self) -> u32 {
        self.unlocked_level_max
    }

    /// Returns true if the id was new
    pub(crate) fn insert_seen(&mut self, question_id: &str) -> bool {
        if self.has_seen(question_id) {
            return false;
        }
        self.seen_question_ids.insert(question_id.to_string())
    }

    /// Returns true if the id was new
    pub(crate) fn insert_correct(&mut self, question_id: &str) -> bool {
        if self.is_correct(question_id) {
            return false;
        }
        self.correct_question_ids.insert(question_id.to_string())
    }

    /// Raise the watermark; never lowers it. Returns true on change.
    pub(crate) fn raise_watermark(&mut self, level: u32) -> bool {
        let level = level.max(FIRST_LEVEL);
        if level > self.unlocked_level_max {
            self.unlocked_level_max = level;
            true
        } else {
            false
        }
    }

    /// Clear seen/correct sets, optionally dropping the watermark back to 1
    pub(crate) fn reset(&mut self, reset_watermark: bool) {
        self.seen_question_ids.clear();
        self.correct_question_ids.clear();
        if reset_watermark {
            self.unlocked_level_max = FIRST_LEVEL;
        }
    }

    /// Union of two records for the same category
    pub(crate) fn merge(&mut self, other: CategoryProgress) {
        self.seen_question_ids.extend(other.seen_question_ids);
        self.correct_question_ids.extend(other.correct_question_ids);
        self.unlocked_level_max = self.unlocked_level_max.max(other.unlocked_level_max);
    }
}

/// Root persisted entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlob {
    #[serde(default = "migration::legacy_schema")]
    pub(crate) schema_version: u32,
    #[serde(default, deserialize_with = "migration::coins")]
    pub(crate) coins: u32,
    /// Empty means not logged in
    #[serde(default, deserialize_with = "migration::nullable")]
    pub(crate) player_name: String,
    #[serde(default, deserialize_with = "migration::nullable")]
    pub(crate) signup_bonus_claimed: bool,
    #[serde(default, deserialize_with = "migration::nullable")]
    pub(crate) settings: Settings,
    #[serde(default, with = "migration::category_list")]
    pub(crate) categories: BTreeMap<String, CategoryProgress>,
}

impl Default for SaveBlob {
    fn default() -> Self {
        Self {
            schema_version: SAVE_SCHEMA_VERSION,
            coins: 0,
            player_name: String::new(),
            signup_bonus_claimed: false,
            settings: Settings::default(),
            categories: BTreeMap::new(),
        }
    }
}

impl SaveBlob {
    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn signup_bonus_claimed(&self) -> bool {
        self.signup_bonus_claimed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn category(&self, category_id: &str) -> Option<&CategoryProgress> {
        self.categories.get(category_id)
    }

    /// Progress records in category id order
    pub fn categories(&self) -> impl Iterator<Item = &CategoryProgress> {
        self.categories.values()
    }

    /// Progress for a category, created with watermark 1 on first access
    pub(crate) fn category_mut(&mut self, category_id: &str) -> &mut CategoryProgress {
        self.categories
            .entry(category_id.to_string())
            .or_insert_with(|| CategoryProgress::new(category_id))
    }
}

/// Failure to write the blob
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode save: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Owns the save blob and its storage backend
pub struct SaveStore {
    storage: Box<dyn KeyValueStore>,
    key: String,
    data: SaveBlob,
}

impl SaveStore {
    /// Open the default save slot and load it
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        Self::open_with_key(storage, SAVE_KEY)
    }

    pub fn open_with_key(storage: Box<dyn KeyValueStore>, key: &str) -> Self {
        let mut store = Self {
            storage,
            key: key.to_string(),
            data: SaveBlob::default(),
        };
        store.load();
        store
    }

    /// (Re)load from storage. Missing or corrupt data becomes a fresh save.
    pub fn load(&mut self) -> &SaveBlob {
        let stored = match self.storage.get(&self.key) {
            Ok(stored) => stored,
            Err(e) => {
                // Unreadable is not the same as absent: keep defaults in memory
                // but don't overwrite whatever is there.
                log::warn!("Save storage unreadable ({}), using defaults", e);
                self.data = SaveBlob::default();
                return &self.data;
            }
        };

        match stored.as_deref().map(str::trim) {
            None | Some("") => {
                log::info!("No save found under '{}', creating fresh save", self.key);
                self.reset_fresh();
            }
            Some(json) => match migration::decode(json) {
                Ok((blob, migrated)) => {
                    self.data = blob;
                    log::info!(
                        "Loaded save ({} coins, {} categories)",
                        self.data.coins,
                        self.data.categories.len()
                    );
                    if migrated {
                        self.save();
                    }
                }
                Err(e) => {
                    log::warn!("Save data corrupt ({}), replacing with fresh save", e);
                    self.reset_fresh();
                }
            },
        }
        &self.data
    }

    /// Write the blob, logging (not propagating) failures.
    /// Returns false if the write did not happen.
    pub fn save(&mut self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Save failed: {}", e);
                false
            }
        }
    }

    pub fn try_save(&mut self) -> Result<(), SaveError> {
        let json = serde_json::to_string(&self.data)?;
        self.storage.set(&self.key, &json)?;
        log::debug!("Save written ({} bytes)", json.len());
        Ok(())
    }

    /// Wipe persisted data and start over with a fresh save
    pub fn delete_all(&mut self) {
        if let Err(e) = self.storage.delete(&self.key) {
            log::warn!("Failed to delete save '{}': {}", self.key, e);
        }
        self.reset_fresh();
        log::info!("Deleted all save data");
    }

    fn reset_fresh(&mut self) {
        self.data = SaveBlob::default();
        self.save();
    }

    pub fn data(&self) -> &SaveBlob {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut SaveBlob {
        &mut self.data
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// Human-readable dump of the current blob
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    /// Backend that refuses every write
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected(key.to_string()))
        }
        fn delete(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    /// Backend whose reads fail; records whether anything was written
    struct UnreadableStore {
        writes: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
        fn delete(&mut self, _key: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    fn stored(store: &SaveStore) -> Option<String> {
        store.storage().get(SAVE_KEY).unwrap()
    }

    #[test]
    fn test_first_load_persists_defaults() {
        let store = SaveStore::open(Box::new(MemoryStore::new()));

        assert_eq!(store.data(), &SaveBlob::default());
        let json = stored(&store).expect("fresh save should be written");
        assert!(json.contains("\"schemaVersion\":2"));
    }

    #[test]
    fn test_unreadable_storage_keeps_defaults_without_writing() {
        let writes = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut store = SaveStore::open(Box::new(UnreadableStore {
            writes: std::rc::Rc::clone(&writes),
        }));

        assert_eq!(store.data(), &SaveBlob::default());
        assert_eq!(writes.get(), 0);

        store.load();
        assert_eq!(writes.get(), 0);
    }

    #[test]
    fn test_corrupt_blob_replaced_with_defaults() {
        let backend = MemoryStore::new().with_entry(SAVE_KEY, "{\"coins\": [oops");
        let store = SaveStore::open(Box::new(backend));

        assert_eq!(store.data().coins(), 0);
        let json = stored(&store).unwrap();
        assert!(serde_json::from_str::<SaveBlob>(&json).is_ok());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = SaveStore::open(Box::new(MemoryStore::new()));
        {
            let data = store.data_mut();
            data.coins = 75;
            data.player_name = "Ana".into();
            let p = data.category_mut("general");
            p.insert_correct("q1");
            p.insert_seen("q1");
            p.insert_seen("q2");
            p.raise_watermark(3);
        }
        store.save();
        let before = store.data().clone();

        store.load();
        store.save();
        store.load();

        assert_eq!(store.data(), &before);
    }

    #[test]
    fn test_legacy_save_is_upgraded_and_rewritten() {
        let legacy = r#"{"coins":10,"categories":[{"categoryId":"g","correctList":["a"],"seenList":["a"],"unlockedLevelMax":2}]}"#;
        let store = SaveStore::open(Box::new(MemoryStore::new().with_entry(SAVE_KEY, legacy)));

        assert_eq!(store.data().coins(), 10);
        assert_eq!(store.data().category("g").unwrap().unlocked_level_max(), 2);
        let json = stored(&store).unwrap();
        assert!(json.contains("correctQuestionIds"));
        assert!(!json.contains("correctList"));
    }

    #[test]
    fn test_delete_all_resets_and_persists() {
        let mut store = SaveStore::open(Box::new(MemoryStore::new()));
        store.data_mut().coins = 500;
        store.data_mut().category_mut("x").insert_correct("1");
        store.save();

        store.delete_all();

        assert_eq!(store.data(), &SaveBlob::default());
        let reloaded: SaveBlob = serde_json::from_str(&stored(&store).unwrap()).unwrap();
        assert_eq!(reloaded.coins(), 0);
        assert_eq!(reloaded.categories().count(), 0);
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let mut store = SaveStore::open(Box::new(ReadOnlyStore(MemoryStore::new())));
        store.data_mut().coins = 3;

        assert!(!store.save());
        assert!(matches!(store.try_save(), Err(SaveError::Storage(_))));
        // In-memory state stays authoritative
        assert_eq!(store.data().coins(), 3);
        store.delete_all();
        assert_eq!(store.data().coins(), 0);
    }

    #[test]
    fn test_category_created_with_watermark_one() {
        let mut blob = SaveBlob::default();
        let p = blob.category_mut("new");
        assert_eq!(p.unlocked_level_max(), 1);
        assert!(!p.raise_watermark(0));
        assert!(p.raise_watermark(2));
        assert!(!p.raise_watermark(1));
        assert_eq!(p.unlocked_level_max(), 2);
    }
}
