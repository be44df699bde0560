//! JS-facing wrapper for the browser build
//!
//! Owns one `Session` backed by LocalStorage plus the round in play. Rich
//! values cross the boundary as JSON strings.

use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::catalog::ContentCatalog;
use crate::config::{CoinPack, UnknownCoinPack};
use crate::consts::DEFAULT_LEVELS_PER_PAGE;
use crate::platform::{self, LocalStorage};
use crate::round::{AnswerResult, RoundSession, RoundTick};
use crate::session::{LevelEntry, Session};

#[wasm_bindgen]
pub struct QuizEngine {
    session: Session,
    round: Option<RoundSession>,
}

#[wasm_bindgen]
impl QuizEngine {
    /// `banks_json` is a JSON array of category bank documents
    #[wasm_bindgen(constructor)]
    pub fn new(banks_json: &str) -> Result<QuizEngine, JsValue> {
        platform::init_logging();
        let banks: Vec<serde_json::Value> =
            serde_json::from_str(banks_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let texts: Vec<String> = banks.iter().map(|b| b.to_string()).collect();
        let catalog = ContentCatalog::from_json_banks(texts.iter().map(String::as_str));
        let storage = LocalStorage::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(QuizEngine {
            session: Session::new(catalog, Box::new(storage)),
            round: None,
        })
    }

    pub fn coins(&self) -> u32 {
        self.session.store().data().coins()
    }

    #[wasm_bindgen(js_name = claimSignupBonus)]
    pub fn claim_signup_bonus(&mut self) -> bool {
        self.session.claim_signup_bonus()
    }

    #[wasm_bindgen(js_name = creditAdReward)]
    pub fn credit_ad_reward(&mut self, completed: bool) -> bool {
        self.session.credit_ad_reward(completed)
    }

    /// Credit a shop pack by name ("small", "medium", "large")
    #[wasm_bindgen(js_name = purchasePack)]
    pub fn purchase_pack(&mut self, name: &str) -> Result<u32, JsValue> {
        let pack: CoinPack = name
            .parse()
            .map_err(|e: UnknownCoinPack| JsValue::from_str(&e.to_string()))?;
        self.session.purchase_pack(pack);
        Ok(self.coins())
    }

    /// Music volume to play at; `muted` is the host's mute (app in background)
    #[wasm_bindgen(js_name = musicVolume)]
    pub fn music_volume(&self, muted: bool) -> f32 {
        self.session.store().data().settings().effective_music_volume(muted)
    }

    #[wasm_bindgen(js_name = sfxVolume)]
    pub fn sfx_volume(&self, muted: bool) -> f32 {
        self.session.store().data().settings().effective_sfx_volume(muted)
    }

    #[wasm_bindgen(js_name = categoryPercent)]
    pub fn category_percent(&mut self, category_id: &str) -> f32 {
        self.session.progress().category_percent(category_id)
    }

    #[wasm_bindgen(js_name = unlockedLevelCount)]
    pub fn unlocked_level_count(&mut self, category_id: &str) -> u32 {
        self.session.progress().unlocked_level_count(category_id)
    }

    #[wasm_bindgen(js_name = canOpenPage)]
    pub fn can_open_page(&mut self, category_id: &str, page: u32) -> bool {
        self.session
            .progress()
            .can_open_page(category_id, page, DEFAULT_LEVELS_PER_PAGE)
    }

    /// "started", "locked", "coins" or "empty"
    #[wasm_bindgen(js_name = enterLevel)]
    pub fn enter_level(&mut self, category_id: &str, level_index: u32) -> String {
        let status = match self.session.enter_level(category_id, level_index) {
            LevelEntry::Started(mut round) => {
                round.present(&mut self.session.progress());
                self.round = Some(round);
                "started"
            }
            LevelEntry::Locked => "locked",
            LevelEntry::InsufficientCoins { .. } => "coins",
            LevelEntry::Empty(_) => "empty",
        };
        status.to_string()
    }

    /// Current question as JSON, or null when nothing is being asked
    #[wasm_bindgen(js_name = currentQuestion)]
    pub fn current_question(&self) -> String {
        let Some(round) = &self.round else {
            return "null".to_string();
        };
        let (shown, total) = round.counter();
        match round.current() {
            Some(q) => json!({
                "id": q.id(),
                "text": q.text(),
                "choices": q.labels(),
                "shown": shown,
                "total": total,
                "secondsLeft": round.answer_timer().seconds_display(),
                "timeFraction": round.answer_timer().fraction_remaining(),
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    /// Returns -1 for a correct answer, otherwise the correct slot (or -2 if ignored)
    pub fn answer(&mut self, slot: usize) -> i32 {
        let Some(round) = self.round.as_mut() else {
            return -2;
        };
        match round.answer(slot, &mut self.session.progress()) {
            AnswerResult::Correct => -1,
            AnswerResult::Wrong { correct_slot } => correct_slot.map_or(-2, |s| s as i32),
            AnswerResult::Ignored => -2,
        }
    }

    /// Advance timers. Returns the round outcome JSON once the round ends,
    /// otherwise an empty string.
    pub fn tick(&mut self, dt: f32) -> String {
        let Some(round) = self.round.as_mut() else {
            return String::new();
        };
        let mut tracker = self.session.progress();
        if round.tick(dt, &mut tracker) != RoundTick::Finished {
            return String::new();
        }
        let outcome = round.finish(&mut tracker);
        drop(tracker);
        self.round = None;
        outcome.map_or_else(String::new, |o| {
            json!({
                "success": o.success,
                "levelNowComplete": o.level_now_complete,
                "justUnlocked": o.just_unlocked,
                "percentAfter": o.percent_after,
                "improved": o.improved,
            })
            .to_string()
        })
    }

    #[wasm_bindgen(js_name = deleteAll)]
    pub fn delete_all(&mut self) {
        self.round = None;
        self.session.delete_all();
    }
}
