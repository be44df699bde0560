//! Walks a built round one question at a time
//!
//! Phases: `Ready` → (`Asking` → `Revealing`)* → `Finished`. Presenting a
//! question marks it seen and starts the answer timer; an answer or a timeout
//! starts the short advance delay before the next question.

use super::builder::{Round, RoundQuestion};
use super::timer::{QuestionTimer, TimerTick};
use crate::config::RoundConfig;
use crate::consts::MIN_SECONDS_PER_QUESTION;
use crate::outcome::{RoundOutcome, RoundOutcomeEvaluator, RoundScore};
use crate::progress::ProgressionTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Built, nothing shown yet
    Ready,
    /// Waiting for an answer
    Asking,
    /// Answer feedback, waiting on the advance delay
    Revealing,
    /// All questions shown
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerResult {
    Correct,
    Wrong { correct_slot: Option<usize> },
    /// No question was awaiting an answer
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTick {
    Idle,
    Counting,
    /// Time ran out; counts as a wrong answer
    TimedOut { correct_slot: Option<usize> },
    /// The next question is now current
    Advanced,
    Finished,
}

#[derive(Debug, Clone)]
pub struct RoundSession {
    round: Round,
    /// Index of the last presented question (kept after the round finishes)
    cursor: Option<usize>,
    correct_count: u32,
    percent_before: f32,
    unlock_threshold: u32,
    phase: RoundPhase,
    answer_timer: QuestionTimer,
    advance_timer: QuestionTimer,
    evaluated: bool,
}

impl RoundSession {
    pub fn start(round: Round, percent_before: f32, config: &RoundConfig) -> Self {
        Self {
            round,
            cursor: None,
            correct_count: 0,
            percent_before,
            unlock_threshold: config.unlock_threshold,
            phase: RoundPhase::Ready,
            answer_timer: QuestionTimer::new(
                config.seconds_per_question.max(MIN_SECONDS_PER_QUESTION),
            ),
            advance_timer: QuestionTimer::new(config.advance_delay_seconds),
            evaluated: false,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&RoundQuestion> {
        if self.phase == RoundPhase::Finished {
            return None;
        }
        self.cursor.and_then(|i| self.round.questions.get(i))
    }

    /// `(shown, total)` for the "3/10" label; a finished round reads `(total, total)`
    pub fn counter(&self) -> (usize, usize) {
        (self.cursor.map_or(0, |i| i + 1), self.round.len())
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn percent_before(&self) -> f32 {
        self.percent_before
    }

    pub fn answer_timer(&self) -> &QuestionTimer {
        &self.answer_timer
    }

    /// Show the next question. Returns false once the round is exhausted.
    pub fn present(&mut self, tracker: &mut ProgressionTracker<'_>) -> bool {
        if self.phase == RoundPhase::Finished {
            return false;
        }
        let next = self.cursor.map_or(0, |i| i + 1);
        let Some(question) = self.round.questions.get(next) else {
            self.phase = RoundPhase::Finished;
            self.answer_timer.stop();
            self.advance_timer.stop();
            return false;
        };

        tracker.mark_seen(&self.round.category_id, &question.question.id);
        self.cursor = Some(next);
        self.phase = RoundPhase::Asking;
        self.advance_timer.stop();
        self.answer_timer.reset();
        true
    }

    pub fn answer(&mut self, slot: usize, tracker: &mut ProgressionTracker<'_>) -> AnswerResult {
        if self.phase != RoundPhase::Asking {
            return AnswerResult::Ignored;
        }
        let Some(question) = self.current() else {
            return AnswerResult::Ignored;
        };
        let correct = question.is_correct(slot);
        let correct_slot = question.correct_slot();
        let question_id = question.question.id.clone();

        self.begin_reveal();
        if correct {
            self.correct_count += 1;
            tracker.mark_correct(&self.round.category_id, &question_id);
            AnswerResult::Correct
        } else {
            AnswerResult::Wrong { correct_slot }
        }
    }

    /// Advance timers by `dt` seconds
    pub fn tick(&mut self, dt: f32, tracker: &mut ProgressionTracker<'_>) -> RoundTick {
        match self.phase {
            RoundPhase::Ready | RoundPhase::Finished => RoundTick::Idle,
            RoundPhase::Asking => match self.answer_timer.tick(dt) {
                TimerTick::Expired => {
                    let correct_slot = self.current().and_then(RoundQuestion::correct_slot);
                    log::debug!("Question timed out");
                    self.begin_reveal();
                    RoundTick::TimedOut { correct_slot }
                }
                _ => RoundTick::Counting,
            },
            RoundPhase::Revealing => match self.advance_timer.tick(dt) {
                TimerTick::Running => RoundTick::Counting,
                _ => {
                    if self.present(tracker) {
                        RoundTick::Advanced
                    } else {
                        RoundTick::Finished
                    }
                }
            },
        }
    }

    /// Evaluate the finished round. None until every question has been shown,
    /// and after the first call.
    pub fn finish(&mut self, tracker: &mut ProgressionTracker<'_>) -> Option<RoundOutcome> {
        if self.phase != RoundPhase::Finished || self.evaluated {
            return None;
        }
        self.evaluated = true;
        let score = RoundScore {
            category_id: self.round.category_id.clone(),
            level_index: self.round.level_index,
            correct_this_round: self.correct_count,
            unlock_threshold: self.unlock_threshold,
            percent_before: self.percent_before,
        };
        Some(RoundOutcomeEvaluator::evaluate(tracker, &score))
    }

    fn begin_reveal(&mut self) {
        self.answer_timer.stop();
        self.advance_timer.reset();
        self.phase = RoundPhase::Revealing;
    }
}
