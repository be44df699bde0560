//! Legacy save shapes
//!
//! Older saves stored id lists as `correctList`/`seenList`, kept categories as
//! a JSON array (possibly with null entries), and had no settings, player name
//! or signup flag. Missing or null fields decode to defaults and out-of-range
//! numbers are clamped. A field of the wrong JSON type still fails the decode,
//! and the store then replaces the blob with a fresh save.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serializer};

use super::save::{CategoryProgress, SaveBlob};
use crate::consts::{FIRST_LEVEL, SAVE_SCHEMA_VERSION};

/// Schema assumed when a save has no version field
pub fn legacy_schema() -> u32 {
    1
}

/// `null` decodes as the type's default
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Signed legacy watermark clamped up to the first level
pub fn watermark<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?.unwrap_or(FIRST_LEVEL as i64);
    Ok(raw.clamp(FIRST_LEVEL as i64, u32::MAX as i64) as u32)
}

pub fn first_level() -> u32 {
    FIRST_LEVEL
}

/// Signed legacy balance clamped into range
pub fn coins<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
    Ok(crate::clamp_coins(raw))
}

/// Categories persist as a list of progress records, keyed in memory by id
pub mod category_list {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        List(Vec<Option<CategoryProgress>>),
        Map(BTreeMap<String, CategoryProgress>),
    }

    pub fn serialize<S>(
        categories: &BTreeMap<String, CategoryProgress>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(categories.values())
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<String, CategoryProgress>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records: Vec<CategoryProgress> = match Option::<Shape>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Shape::List(list)) => list.into_iter().flatten().collect(),
            Some(Shape::Map(map)) => map
                .into_iter()
                .map(|(key, mut p)| {
                    if p.category_id.is_empty() {
                        p.category_id = key;
                    }
                    p
                })
                .collect(),
        };

        let mut categories: BTreeMap<String, CategoryProgress> = BTreeMap::new();
        for record in records {
            if record.category_id.is_empty() {
                log::warn!("Dropping category progress without an id");
                continue;
            }
            match categories.get_mut(&record.category_id) {
                // Duplicate records merge so no answered question is lost
                Some(existing) => existing.merge(record),
                None => {
                    categories.insert(record.category_id.clone(), record);
                }
            }
        }
        Ok(categories)
    }
}

/// Decode a stored blob, upgrading older schemas.
/// Returns the blob and whether it was migrated (and so should be re-saved).
pub fn decode(json: &str) -> Result<(SaveBlob, bool), serde_json::Error> {
    let mut blob: SaveBlob = serde_json::from_str(json)?;
    let migrated = blob.schema_version < SAVE_SCHEMA_VERSION;
    if migrated {
        log::info!(
            "Migrating save from schema {} to {}",
            blob.schema_version,
            SAVE_SCHEMA_VERSION
        );
        blob.schema_version = SAVE_SCHEMA_VERSION;
    }
    blob.settings = std::mem::take(&mut blob.settings).sanitized();
    Ok((blob, migrated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_unity_era_save() {
        let json = r#"{
            "coins": 50,
            "categories": [
                {"categoryId": "general", "correctList": ["q1"], "seenList": ["q1", "q2"], "unlockedLevelMax": 0},
                null
            ]
        }"#;
        let (blob, migrated) = decode(json).unwrap();

        assert!(migrated);
        assert_eq!(blob.schema_version, SAVE_SCHEMA_VERSION);
        assert_eq!(blob.coins, 50);
        assert_eq!(blob.player_name, "");
        assert!(!blob.signup_bonus_claimed);
        assert_eq!(blob.settings, crate::Settings::default());

        let general = &blob.categories["general"];
        assert_eq!(general.unlocked_level_max, 1);
        assert!(general.correct_question_ids.contains("q1"));
        assert_eq!(general.seen_question_ids.len(), 2);
    }

    #[test]
    fn test_decode_negative_coins_and_null_lists() {
        let json = r#"{"coins": -20, "playerName": null, "categories": [
            {"categoryId": "a", "correctList": null, "unlockedLevelMax": -3}
        ]}"#;
        let (blob, _) = decode(json).unwrap();

        assert_eq!(blob.coins, 0);
        assert_eq!(blob.categories["a"].unlocked_level_max, 1);
        assert!(blob.categories["a"].correct_question_ids.is_empty());
    }

    #[test]
    fn test_decode_map_shaped_categories() {
        let json = r#"{"schemaVersion": 2, "categories": {
            "music": {"correctQuestionIds": ["m1"], "unlockedLevelMax": 3}
        }}"#;
        let (blob, migrated) = decode(json).unwrap();

        assert!(!migrated);
        let music = &blob.categories["music"];
        assert_eq!(music.category_id, "music");
        assert_eq!(music.unlocked_level_max, 3);
    }

    #[test]
    fn test_duplicate_records_merge() {
        let json = r#"{"categories": [
            {"categoryId": "a", "correctList": ["1"], "unlockedLevelMax": 2},
            {"categoryId": "a", "correctList": ["2"], "unlockedLevelMax": 1}
        ]}"#;
        let (blob, _) = decode(json).unwrap();
        let a = &blob.categories["a"];

        assert_eq!(blob.categories.len(), 1);
        assert_eq!(a.correct_question_ids.len(), 2);
        assert_eq!(a.unlocked_level_max, 2);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode("{not json").is_err());
        assert!(decode(r#"{"coins": "lots"}"#).is_err());
    }
}
