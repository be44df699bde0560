//! Quiz Progress - progression and round-selection engine for a trivia game
//!
//! Core modules:
//! - `catalog`: Read-only question content (categories, levels, questions)
//! - `persistence`: Save blob load/save with legacy migration
//! - `platform`: Key-value storage backends and logging setup
//! - `economy`: Coin balance, spending and rewards
//! - `progress`: Seen/correct tracking and level gating
//! - `round`: Round selection, choice shuffling, timers and round flow
//! - `outcome`: End-of-round evaluation
//! - `session`: Top-level context that owns all of the above
//! - `web`: wasm-bindgen wrapper for the browser build

pub mod catalog;
pub mod config;
pub mod economy;
pub mod events;
pub mod outcome;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod progress;
pub mod round;
pub mod session;
pub mod settings;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{Category, ContentCatalog, Level, Question};
pub use config::{CoinPack, EconomyConfig, RoundConfig, UnknownCoinPack};
pub use economy::EconomyLedger;
pub use events::{EventBus, GameEvent};
pub use outcome::{RoundOutcome, RoundOutcomeEvaluator, RoundScore};
pub use persistence::{CategoryProgress, SaveBlob, SaveStore};
pub use progress::ProgressionTracker;
pub use round::{Round, RoundBuilder, RoundPlan, RoundSession};
pub use session::{LevelEntry, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Storage key of the single save blob (kept so existing saves still load)
    pub const SAVE_KEY: &str = "QUIZ_SAVE_V1";
    /// Schema written by this crate. Saves without a version are schema 1.
    pub const SAVE_SCHEMA_VERSION: u32 = 2;

    /// First (always unlocked) level index
    pub const FIRST_LEVEL: u32 = 1;

    /// Coin balance ceiling (fits the legacy 32-bit signed field)
    pub const MAX_COINS: u32 = i32::MAX as u32;

    /// Tolerance when comparing completion percentages
    pub const PERCENT_EPSILON: f32 = 0.0001;

    /// Round defaults
    pub const DEFAULT_QUESTIONS_PER_ROUND: usize = 10;
    pub const DEFAULT_UNLOCK_THRESHOLD: u32 = 8;
    pub const DEFAULT_SECONDS_PER_QUESTION: f32 = 15.0;
    /// Shortest answer time a round will run with
    pub const MIN_SECONDS_PER_QUESTION: f32 = 1.0;
    /// Pause between an answer (or timeout) and the next question
    pub const DEFAULT_ADVANCE_DELAY: f32 = 0.2;

    /// Name used when the player confirms an empty nickname
    pub const DEFAULT_PLAYER_NAME: &str = "Player";

    /// Levels shown per level-select page
    pub const DEFAULT_LEVELS_PER_PAGE: u32 = 20;
}

/// Completion percentage of `correct` out of `total`, bounded to [0, 100]
#[inline]
pub fn completion_percent(correct: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (correct as f32 / total as f32 * 100.0).clamp(0.0, 100.0)
}

/// Clamp a signed coin amount into the valid balance range
#[inline]
pub fn clamp_coins(value: i64) -> u32 {
    value.clamp(0, consts::MAX_COINS as i64) as u32
}
