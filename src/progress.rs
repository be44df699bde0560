//! Per-category progression
//!
//! Tracks seen/correct questions and the unlocked-level watermark, answers
//! completion queries against the catalog, and gates the level select screen.
//!
//! Unknown categories and levels are never errors: queries return false / 0.

use crate::catalog::{ContentCatalog, Level};
use crate::completion_percent;
use crate::consts::FIRST_LEVEL;
use crate::economy::EconomyLedger;
use crate::events::{EventBus, GameEvent};
use crate::persistence::{CategoryProgress, SaveStore};

/// Progression view over the catalog and the save blob
pub struct ProgressionTracker<'a> {
    catalog: &'a ContentCatalog,
    store: &'a mut SaveStore,
    events: &'a mut EventBus,
}

impl<'a> ProgressionTracker<'a> {
    pub fn new(
        catalog: &'a ContentCatalog,
        store: &'a mut SaveStore,
        events: &'a mut EventBus,
    ) -> Self {
        Self {
            catalog,
            store,
            events,
        }
    }

    pub fn catalog(&self) -> &ContentCatalog {
        self.catalog
    }

    // -----------------------
    // Progress records
    // -----------------------

    /// Progress for a category, created (watermark 1) on first access
    pub fn progress(&mut self, category_id: &str) -> &CategoryProgress {
        self.store.data_mut().category_mut(category_id)
    }

    /// Existing progress without creating it
    pub fn peek(&self, category_id: &str) -> Option<&CategoryProgress> {
        self.store.data().category(category_id)
    }

    fn is_correct(&self, category_id: &str, question_id: &str) -> bool {
        self.peek(category_id)
            .is_some_and(|p| p.is_correct(question_id))
    }

    fn correct_count(&self, category_id: &str) -> usize {
        self.peek(category_id).map_or(0, |p| p.correct().len())
    }

    // -----------------------
    // Marking progress
    // -----------------------

    /// Record that a question was shown. Saves immediately.
    pub fn mark_seen(&mut self, category_id: &str, question_id: &str) {
        if self.mark_seen_deferred(category_id, question_id) {
            self.store.save();
        }
    }

    /// Record a correct answer. Saves immediately.
    pub fn mark_correct(&mut self, category_id: &str, question_id: &str) {
        if self.mark_correct_deferred(category_id, question_id) {
            self.store.save();
        }
    }

    /// `mark_seen` without the save; call `flush` afterwards.
    /// Returns true if the id was new.
    pub fn mark_seen_deferred(&mut self, category_id: &str, question_id: &str) -> bool {
        self.store
            .data_mut()
            .category_mut(category_id)
            .insert_seen(question_id)
    }

    /// `mark_correct` without the save; call `flush` afterwards.
    /// Returns true if the id was new.
    pub fn mark_correct_deferred(&mut self, category_id: &str, question_id: &str) -> bool {
        let added = self
            .store
            .data_mut()
            .category_mut(category_id)
            .insert_correct(question_id);
        if added {
            self.notify_percent(category_id);
        }
        added
    }

    /// Persist batched changes
    pub fn flush(&mut self) {
        self.store.save();
    }

    // -----------------------
    // Completion queries
    // -----------------------

    /// Share of the category answered correctly, in [0, 100]
    pub fn percent(&self, category_id: &str, total_questions: i64) -> f32 {
        if total_questions <= 0 {
            return 0.0;
        }
        let total = usize::try_from(total_questions).unwrap_or(usize::MAX);
        completion_percent(self.correct_count(category_id), total)
    }

    /// `percent` against the catalog's own question total
    pub fn category_percent(&self, category_id: &str) -> f32 {
        self.percent(category_id, self.total_question_count(category_id) as i64)
    }

    pub fn total_question_count(&self, category_id: &str) -> usize {
        self.catalog.total_question_count(category_id)
    }

    fn level(&self, category_id: &str, level_index: u32) -> Option<&'a Level> {
        self.catalog.level(category_id, level_index)
    }

    /// True iff the level has questions and every one has been answered correctly
    pub fn is_level_complete(&self, category_id: &str, level_index: u32) -> bool {
        let Some(level) = self.level(category_id, level_index) else {
            return false;
        };
        !level.is_empty()
            && level
                .questions
                .iter()
                .all(|q| self.is_correct(category_id, &q.id))
    }

    /// Questions in the level not yet answered correctly
    pub fn level_remaining_count(&self, category_id: &str, level_index: u32) -> usize {
        self.level(category_id, level_index).map_or(0, |level| {
            level
                .questions
                .iter()
                .filter(|q| !self.is_correct(category_id, &q.id))
                .count()
        })
    }

    /// True if every level in `from..=to` is complete
    pub fn are_levels_complete_in_range(&self, category_id: &str, from: u32, to: u32) -> bool {
        let from = from.max(FIRST_LEVEL);
        if to < from {
            return true;
        }
        (from..=to).all(|level| self.is_level_complete(category_id, level))
    }

    // -----------------------
    // Levels: gating
    // -----------------------

    /// Highest unlocked level (1..N)
    pub fn unlocked_level_count(&self, category_id: &str) -> u32 {
        self.peek(category_id)
            .map_or(FIRST_LEVEL, CategoryProgress::unlocked_level_max)
    }

    /// Unlocked and has content
    pub fn is_level_playable(&self, category_id: &str, level_index: u32) -> bool {
        level_index >= FIRST_LEVEL
            && level_index <= self.unlocked_level_count(category_id)
            && self.catalog.level_has_content(category_id, level_index)
    }

    /// Level-select paging: page 1 is always open, page `p` needs levels
    /// `1..=(p-1)*levels_per_page` complete.
    pub fn can_open_page(&self, category_id: &str, page: u32, levels_per_page: u32) -> bool {
        if page <= 1 {
            return true;
        }
        if levels_per_page == 0 || self.catalog.category(category_id).is_none() {
            return false;
        }
        let required = (page - 1).saturating_mul(levels_per_page);
        self.are_levels_complete_in_range(category_id, FIRST_LEVEL, required)
    }

    /// If the level is complete, unlock the next one (capped at the level count).
    /// Returns true if the watermark rose.
    pub fn unlock_next_level_if_complete(&mut self, category_id: &str, level_index: u32) -> bool {
        let Some(category) = self.catalog.category(category_id) else {
            return false;
        };
        if !self.is_level_complete(category_id, level_index) {
            return false;
        }

        let desired = level_index.saturating_add(1).min(category.level_count());
        self.raise_watermark(category_id, desired)
    }

    /// Administrative override: unlock at least up to `level_index`
    pub fn force_unlock_up_to(&mut self, category_id: &str, level_index: u32) {
        let target = level_index.max(FIRST_LEVEL);
        if !self.raise_watermark(category_id, target) {
            // Record is created on first access either way
            self.store.save();
        }
        log::info!("Force-unlocked '{}' up to level {}", category_id, target);
    }

    fn raise_watermark(&mut self, category_id: &str, level: u32) -> bool {
        let raised = self
            .store
            .data_mut()
            .category_mut(category_id)
            .raise_watermark(level);
        if raised {
            self.store.save();
            log::info!("Unlocked level {} in '{}'", level, category_id);
            self.events.emit(GameEvent::LevelUnlocked {
                category_id: category_id.to_string(),
                level,
            });
        }
        raised
    }

    // -----------------------
    // Maintenance / Debug
    // -----------------------

    /// Clear one category's progress (coins are untouched)
    pub fn reset_category(&mut self, category_id: &str, keep_unlock_at_one: bool) {
        self.store
            .data_mut()
            .category_mut(category_id)
            .reset(keep_unlock_at_one);
        self.store.save();
        log::info!("Reset progress for '{}'", category_id);
        self.notify_percent(category_id);
    }

    /// Clear every category. The balance is never touched by the reset;
    /// with `keep_coins` it is re-applied afterwards so listeners get a
    /// `CoinsChanged`.
    pub fn reset_all_progress(&mut self, keep_coins: bool) {
        let coins_backup = self.store.data().coins();

        let ids: Vec<String> = self.store.data().categories.keys().cloned().collect();
        for progress in self.store.data_mut().categories.values_mut() {
            progress.reset(true);
        }
        self.store.save();
        log::info!("Reset progress for {} categories", ids.len());

        for id in &ids {
            self.notify_percent(id);
        }

        if keep_coins {
            EconomyLedger::new(&mut *self.store, &mut *self.events).set_coins(coins_backup as i64);
        }
    }

    /// Emit an event on the shared bus
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.emit(event);
    }

    fn notify_percent(&mut self, category_id: &str) {
        let percent = self.category_percent(category_id);
        self.events.emit(GameEvent::CategoryProgressChanged {
            category_id: category_id.to_string(),
            percent,
        });
    }
}
