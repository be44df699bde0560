//! Category bank JSON parsing
//!
//! A bank document carries either `levels: [{levelIndex, questions}]` or a
//! legacy flat `questions` list. Both resolve to a normalized `Category`.

use std::collections::HashSet;

use serde::Deserialize;

use super::model::{Category, Level, LevelSource, Question};

/// Malformed content
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid category bank json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("category bank has no categoryId")]
    MissingCategoryId,

    #[error("category '{category}': level index must be >= 1, got {index}")]
    InvalidLevelIndex { category: String, index: u32 },

    #[error("category '{category}': level {index} appears more than once")]
    DuplicateLevel { category: String, index: u32 },

    #[error("category '{category}': question id '{id}' is not unique")]
    DuplicateQuestion { category: String, id: String },

    #[error("category '{category}': question '{id}' needs at least 2 choices")]
    TooFewChoices { category: String, id: String },

    #[error("category '{category}': question '{id}' correctIndex {index} out of range")]
    CorrectIndexOutOfRange {
        category: String,
        id: String,
        index: usize,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelDoc {
    #[serde(default = "first_level")]
    level_index: u32,
    #[serde(default)]
    questions: Option<Vec<Question>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryBankDoc {
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    category_name: Option<String>,
    #[serde(default)]
    questions_per_round: Option<usize>,
    #[serde(default)]
    levels: Option<Vec<LevelDoc>>,
    /// Legacy flat list, treated as level 1
    #[serde(default)]
    questions: Option<Vec<Question>>,
}

fn first_level() -> u32 {
    crate::consts::FIRST_LEVEL
}

impl CategoryBankDoc {
    fn level_source(self) -> LevelSource {
        match self.levels {
            Some(levels) if !levels.is_empty() => LevelSource::Leveled(
                levels
                    .into_iter()
                    .map(|l| Level {
                        index: l.level_index,
                        questions: l.questions.unwrap_or_default(),
                    })
                    .collect(),
            ),
            _ => LevelSource::Flat(self.questions.unwrap_or_default()),
        }
    }
}

/// Parse and validate one category bank document
pub fn parse_bank(json: &str) -> Result<Category, CatalogError> {
    let doc: CategoryBankDoc = serde_json::from_str(json)?;

    let id = match doc.category_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(CatalogError::MissingCategoryId),
    };
    let name = doc.category_name.clone().unwrap_or_else(|| id.clone());
    // A zero round size in old banks meant "unset"
    let round_size = doc.questions_per_round.filter(|n| *n > 0);

    let category = Category::new(id, name, doc.level_source()).with_round_size(round_size);
    validate(&category)?;
    Ok(category)
}

fn validate(category: &Category) -> Result<(), CatalogError> {
    let mut level_indices = HashSet::new();
    let mut question_ids = HashSet::new();

    for level in category.levels() {
        if level.index < 1 {
            return Err(CatalogError::InvalidLevelIndex {
                category: category.id.clone(),
                index: level.index,
            });
        }
        if !level_indices.insert(level.index) {
            return Err(CatalogError::DuplicateLevel {
                category: category.id.clone(),
                index: level.index,
            });
        }

        for q in &level.questions {
            if !question_ids.insert(q.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion {
                    category: category.id.clone(),
                    id: q.id.clone(),
                });
            }
            if q.choices.len() < 2 {
                return Err(CatalogError::TooFewChoices {
                    category: category.id.clone(),
                    id: q.id.clone(),
                });
            }
            if q.correct_index >= q.choices.len() {
                return Err(CatalogError::CorrectIndexOutOfRange {
                    category: category.id.clone(),
                    id: q.id.clone(),
                    index: q.correct_index,
                });
            }
        }
    }
    Ok(())
}
