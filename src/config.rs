//! Data-driven economy and round tuning
//!
//! Both structs deserialize from partial JSON; missing fields keep defaults.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Coin pack sizes offered by the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinPack {
    Small,
    Medium,
    Large,
}

impl CoinPack {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinPack::Small => "Small",
            CoinPack::Medium => "Medium",
            CoinPack::Large => "Large",
        }
    }

}

/// Shop id that names no pack
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown coin pack '{0}'")]
pub struct UnknownCoinPack(pub String);

impl FromStr for CoinPack {
    type Err = UnknownCoinPack;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Ok(CoinPack::Small),
            "medium" | "med" | "m" => Ok(CoinPack::Medium),
            "large" | "l" => Ok(CoinPack::Large),
            _ => Err(UnknownCoinPack(s.to_string())),
        }
    }
}

/// Costs and rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EconomyConfig {
    // === One-time bonuses ===
    pub signup_bonus_coins: i64,

    // === Costs ===
    /// Charged when entering any level (no refund on quit)
    pub level_entry_cost: i64,

    // === Rewards ===
    /// Credited after a completed reward video
    pub ad_coins_reward: i64,

    // === Shop ===
    pub pack_small_coins: i64,
    pub pack_medium_coins: i64,
    pub pack_large_coins: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            signup_bonus_coins: 100,
            level_entry_cost: 5,
            ad_coins_reward: 20,
            pack_small_coins: 100,
            pack_medium_coins: 300,
            pack_large_coins: 1000,
        }
    }
}

impl EconomyConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Coins granted by a shop pack
    pub fn pack_coins(&self, pack: CoinPack) -> i64 {
        match pack {
            CoinPack::Small => self.pack_small_coins,
            CoinPack::Medium => self.pack_medium_coins,
            CoinPack::Large => self.pack_large_coins,
        }
    }
}

/// Round sizing, pass mark and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundConfig {
    /// Target round length (a category's own `questionsPerRound` wins)
    pub questions_per_round: usize,
    /// Correct answers needed for a successful round
    pub unlock_threshold: u32,
    pub seconds_per_question: f32,
    pub advance_delay_seconds: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            questions_per_round: DEFAULT_QUESTIONS_PER_ROUND,
            unlock_threshold: DEFAULT_UNLOCK_THRESHOLD,
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            advance_delay_seconds: DEFAULT_ADVANCE_DELAY,
        }
    }
}

impl RoundConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
