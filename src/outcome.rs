//! End-of-round evaluation
//!
//! Decides whether the round passed, unlocks the next level when the played
//! one is fully learned, and reports the completion delta.

use crate::consts::PERCENT_EPSILON;
use crate::events::GameEvent;
use crate::progress::ProgressionTracker;

/// Tally of a finished round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundScore {
    pub category_id: String,
    pub level_index: u32,
    pub correct_this_round: u32,
    pub unlock_threshold: u32,
    /// Category percent captured when the round started
    pub percent_before: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub success: bool,
    pub level_now_complete: bool,
    pub just_unlocked: bool,
    pub percent_after: f32,
    pub improved: bool,
}

pub struct RoundOutcomeEvaluator;

impl RoundOutcomeEvaluator {
    pub fn evaluate(tracker: &mut ProgressionTracker<'_>, score: &RoundScore) -> RoundOutcome {
        let category = score.category_id.as_str();
        let success = score.correct_this_round >= score.unlock_threshold;
        let level_now_complete = tracker.is_level_complete(category, score.level_index);

        // Passing alone is not enough: the level must be fully learned
        let just_unlocked =
            success && tracker.unlock_next_level_if_complete(category, score.level_index);

        let percent_after = tracker.category_percent(category);
        let improved = percent_after > score.percent_before + PERCENT_EPSILON;

        let outcome = RoundOutcome {
            success,
            level_now_complete,
            just_unlocked,
            percent_after,
            improved,
        };
        log::info!(
            "Round over in '{}' level {}: {}/{} needed, complete={}, unlocked={}, {:.1}% -> {:.1}%",
            category,
            score.level_index,
            score.correct_this_round,
            score.unlock_threshold,
            level_now_complete,
            just_unlocked,
            score.percent_before,
            percent_after
        );

        tracker.emit(GameEvent::RoundOutcome(outcome.clone()));
        if improved {
            tracker.emit(GameEvent::CategoryProgressChanged {
                category_id: score.category_id.clone(),
                percent: percent_after,
            });
        }
        outcome
    }
}
