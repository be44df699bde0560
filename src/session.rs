//! Top-level game context
//!
//! `Session` owns the catalog, the save store, the event bus and the tuning
//! configs. Component views (`economy()`, `progress()`, `profile()`) borrow
//! from it, so only one of them can mutate at a time.

use crate::catalog::ContentCatalog;
use crate::config::{CoinPack, EconomyConfig, RoundConfig};
use crate::economy::EconomyLedger;
use crate::events::{EventBus, GameEvent};
use crate::persistence::SaveStore;
use crate::platform::KeyValueStore;
use crate::profile::Profile;
use crate::progress::ProgressionTracker;
use crate::round::{EmptyRoundReason, RoundBuilder, RoundPlan, RoundSession};

/// Result of trying to enter a level
#[derive(Debug)]
pub enum LevelEntry {
    /// Entry cost paid, round ready to present
    Started(RoundSession),
    /// Above the category's unlock watermark
    Locked,
    InsufficientCoins { needed: u32, have: u32 },
    Empty(EmptyRoundReason),
}

pub struct Session {
    catalog: ContentCatalog,
    store: SaveStore,
    events: EventBus,
    economy_config: EconomyConfig,
    round_config: RoundConfig,
    builder: RoundBuilder,
}

impl Session {
    /// Open a session with default tuning and an entropy-seeded round builder
    pub fn new(catalog: ContentCatalog, storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_config(
            catalog,
            storage,
            EconomyConfig::default(),
            RoundConfig::default(),
        )
    }

    pub fn with_config(
        catalog: ContentCatalog,
        storage: Box<dyn KeyValueStore>,
        economy_config: EconomyConfig,
        round_config: RoundConfig,
    ) -> Self {
        let store = SaveStore::open(storage);
        log::info!(
            "Session opened: {} categories, {} coins",
            catalog.len(),
            store.data().coins()
        );
        Self {
            catalog,
            store,
            events: EventBus::new(),
            economy_config,
            round_config,
            builder: RoundBuilder::from_entropy(),
        }
    }

    /// Replace the round builder with a seeded one (reproducible rounds)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.builder = RoundBuilder::from_seed(seed);
        self
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn economy_config(&self) -> &EconomyConfig {
        &self.economy_config
    }

    pub fn round_config(&self) -> &RoundConfig {
        &self.round_config
    }

    pub fn economy(&mut self) -> EconomyLedger<'_> {
        EconomyLedger::new(&mut self.store, &mut self.events)
    }

    pub fn progress(&mut self) -> ProgressionTracker<'_> {
        ProgressionTracker::new(&self.catalog, &mut self.store, &mut self.events)
    }

    pub fn profile(&mut self) -> Profile<'_> {
        Profile::new(&mut self.store)
    }

    // -----------------------
    // Economy shortcuts using the session's config
    // -----------------------

    pub fn claim_signup_bonus(&mut self) -> bool {
        let amount = self.economy_config.signup_bonus_coins;
        self.economy().grant_signup_bonus_once(amount)
    }

    pub fn credit_ad_reward(&mut self, completed: bool) -> bool {
        let config = self.economy_config.clone();
        self.economy().credit_ad_reward(&config, completed)
    }

    pub fn purchase_pack(&mut self, pack: CoinPack) {
        let config = self.economy_config.clone();
        self.economy().purchase_pack(&config, pack);
    }

    // -----------------------
    // Rounds
    // -----------------------

    /// Target round length for a category
    pub fn round_size(&self, category_id: &str) -> usize {
        self.catalog
            .category(category_id)
            .and_then(|c| c.questions_per_round)
            .unwrap_or(self.round_config.questions_per_round)
    }

    /// Select a round without charging or gating
    pub fn build_round(&mut self, category_id: &str, level_index: u32) -> RoundPlan {
        let target = self.round_size(category_id);
        let progress = self.store.data().category(category_id);
        self.builder
            .build(&self.catalog, progress, category_id, level_index, target)
    }

    /// Build, gate, then charge the entry cost. Nothing is charged unless a
    /// playable round was built.
    pub fn enter_level(&mut self, category_id: &str, level_index: u32) -> LevelEntry {
        let round = match self.build_round(category_id, level_index) {
            RoundPlan::Ready(round) if !round.is_empty() => round,
            RoundPlan::Ready(_) => return LevelEntry::Empty(EmptyRoundReason::NoQuestions),
            RoundPlan::Empty(reason) => return LevelEntry::Empty(reason),
        };

        if !self.progress().is_level_playable(category_id, level_index) {
            log::info!("Level {} of '{}' is locked", level_index, category_id);
            return LevelEntry::Locked;
        }

        let cost = self.economy_config.level_entry_cost;
        let mut economy = self.economy();
        if !economy.try_spend(cost) {
            return LevelEntry::InsufficientCoins {
                needed: economy.coins_missing(cost),
                have: economy.coins(),
            };
        }

        let percent_before = self.progress().category_percent(category_id);
        log::info!(
            "Entered '{}' level {} ({} questions)",
            category_id,
            level_index,
            round.len()
        );
        LevelEntry::Started(RoundSession::start(
            round,
            percent_before,
            &self.round_config,
        ))
    }

    /// Wipe the save and start over from defaults
    pub fn delete_all(&mut self) {
        self.store.delete_all();
        let coins = self.store.data().coins();
        self.events.emit(GameEvent::CoinsChanged { coins });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, LevelSource};
    use crate::consts::SAVE_KEY;
    use crate::events::testing::record;
    use crate::platform::MemoryStore;
    use crate::progress::fixtures::*;
    use crate::round::{AnswerResult, RoundPhase, RoundTick};

    fn session() -> Session {
        Session::new(catalog(), Box::new(MemoryStore::new())).with_seed(11)
    }

    fn play_perfect(session: &mut Session, mut round: RoundSession) -> crate::RoundOutcome {
        let mut tracker = session.progress();
        round.present(&mut tracker);
        while round.phase() != RoundPhase::Finished {
            let slot = round.current().unwrap().correct_slot().unwrap();
            assert_eq!(round.answer(slot, &mut tracker), AnswerResult::Correct);
            while !matches!(
                round.tick(1.0, &mut tracker),
                RoundTick::Advanced | RoundTick::Finished
            ) {}
        }
        round.finish(&mut tracker).unwrap()
    }

    #[test]
    fn test_enter_level_charges_and_starts() {
        let mut session = session();
        assert!(session.claim_signup_bonus());
        assert!(!session.claim_signup_bonus());

        let LevelEntry::Started(round) = session.enter_level("science", 1) else {
            panic!("level 1 should start");
        };
        assert_eq!(round.counter(), (0, 10));
        assert_eq!(session.store().data().coins(), 95);
    }

    #[test]
    fn test_enter_level_without_coins() {
        let mut session = session();
        match session.enter_level("science", 1) {
            LevelEntry::InsufficientCoins { needed, have } => {
                assert_eq!(needed, 5);
                assert_eq!(have, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_locked_and_empty_levels_cost_nothing() {
        let mut session = session();
        session.economy().set_coins(50);

        assert!(matches!(session.enter_level("science", 2), LevelEntry::Locked));
        assert!(matches!(
            session.enter_level("hollow", 1),
            LevelEntry::Empty(EmptyRoundReason::NoQuestions)
        ));
        assert!(matches!(
            session.enter_level("nope", 1),
            LevelEntry::Empty(EmptyRoundReason::UnknownCategory)
        ));
        assert_eq!(session.store().data().coins(), 50);
    }

    #[test]
    fn test_category_round_size_override() {
        let catalog = ContentCatalog::new().with_category(
            category("quick", 1, 12).with_round_size(Some(5)),
        );
        let mut session = Session::new(catalog, Box::new(MemoryStore::new())).with_seed(3);
        assert_eq!(session.round_size("quick"), 5);
        assert_eq!(session.round_size("other"), 10);
        assert_eq!(session.build_round("quick", 1).into_round().unwrap().len(), 5);
    }

    #[test]
    fn test_perfect_round_unlocks_and_persists() {
        let mut session = session();
        session.economy().set_coins(10);
        let seen = record(session.events_mut());

        let LevelEntry::Started(round) = session.enter_level("science", 1) else {
            panic!("level 1 should start");
        };
        let outcome = play_perfect(&mut session, round);
        assert!(outcome.just_unlocked);

        assert!(matches!(session.enter_level("science", 2), LevelEntry::Started(_)));
        assert_eq!(session.store().data().coins(), 0);
        assert!(seen.borrow().contains(&GameEvent::RoundOutcome(outcome)));

        let json = session.store().storage().get(SAVE_KEY).unwrap().unwrap();
        assert!(json.contains("\"unlockedLevelMax\":2"));
    }

    #[test]
    fn test_delete_all_resets_and_notifies() {
        let mut session = session();
        session.claim_signup_bonus();
        session.profile().set_player_name("Kai");
        session.progress().mark_correct("science", "science-L1-0");
        let seen = record(session.events_mut());

        session.delete_all();

        let data = session.store().data();
        assert_eq!(data.coins(), 0);
        assert_eq!(data.player_name(), "");
        assert!(!data.signup_bonus_claimed());
        assert!(data.category("science").is_none());
        assert_eq!(seen.borrow().as_slice(), &[GameEvent::CoinsChanged { coins: 0 }]);
    }

    #[test]
    fn test_shop_and_ads_use_session_config() {
        let economy = EconomyConfig {
            ad_coins_reward: 7,
            ..EconomyConfig::default()
        };
        let mut session = Session::with_config(
            ContentCatalog::new().with_category(Category::new(
                "flat",
                "Flat",
                LevelSource::Flat(vec![question("f1")]),
            )),
            Box::new(MemoryStore::new()),
            economy,
            RoundConfig::default(),
        );
        assert!(!session.credit_ad_reward(false));
        assert!(session.credit_ad_reward(true));
        session.purchase_pack("small".parse().unwrap());
        assert_eq!(session.store().data().coins(), 107);
    }
}
