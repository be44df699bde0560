//! Question content types
//!
//! Categories are always normalized to explicit levels. A legacy flat
//! question list becomes a single level with index 1.

use serde::{Deserialize, Serialize};

use crate::consts::FIRST_LEVEL;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within its category
    pub id: String,
    pub text: String,
    /// Display order as authored; shuffled per round
    pub choices: Vec<String>,
    /// Index into `choices` of the right answer
    pub correct_index: usize,
    #[serde(default)]
    pub difficulty: i32,
}

impl Question {
    /// Text of the correct choice (None for malformed data)
    pub fn correct_choice(&self) -> Option<&str> {
        self.choices.get(self.correct_index).map(String::as_str)
    }
}

/// An ordered block of questions inside a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level index
    pub index: u32,
    pub questions: Vec<Question>,
}

impl Level {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

/// How a category's questions were authored
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSource {
    /// Explicit levels
    Leveled(Vec<Level>),
    /// Legacy: one flat list, no level structure
    Flat(Vec<Question>),
}

impl LevelSource {
    /// Resolve into the normalized level list
    pub fn into_levels(self) -> Vec<Level> {
        match self {
            LevelSource::Leveled(mut levels) => {
                levels.sort_by_key(|l| l.index);
                levels
            }
            LevelSource::Flat(questions) => vec![Level {
                index: FIRST_LEVEL,
                questions,
            }],
        }
    }
}

/// A themed question set
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Optional per-category round size override
    pub questions_per_round: Option<usize>,
    /// Sorted by index
    levels: Vec<Level>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: LevelSource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            questions_per_round: None,
            levels: source.into_levels(),
        }
    }

    pub fn with_round_size(mut self, questions_per_round: Option<usize>) -> Self {
        self.questions_per_round = questions_per_round;
        self
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level by 1-based index
    pub fn level(&self, index: u32) -> Option<&Level> {
        self.levels.iter().find(|l| l.index == index)
    }

    /// Number of levels (a flat category counts as one)
    pub fn level_count(&self) -> u32 {
        self.levels.len().max(1) as u32
    }

    pub fn total_questions(&self) -> usize {
        self.levels.iter().map(Level::len).sum()
    }

    /// True if the level exists and has at least one question
    pub fn level_has_content(&self, index: u32) -> bool {
        self.level(index).is_some_and(|l| !l.is_empty())
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.levels.iter().flat_map(|l| l.questions.iter())
    }
}
