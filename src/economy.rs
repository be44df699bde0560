//! Coin balance operations
//!
//! Every mutation is clamped to `[0, MAX_COINS]`, saved immediately, then
//! announced with `GameEvent::CoinsChanged`.

use crate::clamp_coins;
use crate::config::{CoinPack, EconomyConfig};
use crate::events::{EventBus, GameEvent};
use crate::persistence::SaveStore;

/// Coin ledger over the save blob
pub struct EconomyLedger<'a> {
    store: &'a mut SaveStore,
    events: &'a mut EventBus,
}

impl<'a> EconomyLedger<'a> {
    pub fn new(store: &'a mut SaveStore, events: &'a mut EventBus) -> Self {
        Self { store, events }
    }

    pub fn coins(&self) -> u32 {
        self.store.data().coins
    }

    /// Negative amounts count as zero
    pub fn has_coins(&self, amount: i64) -> bool {
        self.coins() as i64 >= amount.max(0)
    }

    /// How many coins short of `needed` the player is
    pub fn coins_missing(&self, needed: i64) -> u32 {
        clamp_coins(needed - self.coins() as i64)
    }

    /// Spend if affordable; the balance is untouched on failure
    pub fn try_spend(&mut self, amount: i64) -> bool {
        let amount = amount.max(0);
        if !self.has_coins(amount) {
            log::info!("Spend of {} refused (balance {})", amount, self.coins());
            return false;
        }
        if amount > 0 {
            self.set_coins(self.coins() as i64 - amount);
        }
        true
    }

    pub fn add_coins(&mut self, amount: i64) {
        self.set_coins((self.coins() as i64).saturating_add(amount));
    }

    pub fn set_coins(&mut self, value: i64) {
        self.store.data_mut().coins = clamp_coins(value);
        self.store.save();
        self.notify();
    }

    /// Credit the signup bonus once per save lifetime. Returns true if granted.
    pub fn grant_signup_bonus_once(&mut self, amount: i64) -> bool {
        let data = self.store.data_mut();
        if data.signup_bonus_claimed {
            return false;
        }
        data.signup_bonus_claimed = true;
        data.coins = clamp_coins((data.coins as i64).saturating_add(amount));
        self.store.save();
        log::info!("Signup bonus of {} granted", amount);
        self.notify();
        true
    }

    /// Charge the level entry cost; false if the player can't afford it
    pub fn pay_level_entry(&mut self, config: &EconomyConfig) -> bool {
        self.try_spend(config.level_entry_cost)
    }

    /// Credit the reward-video payout. The ad SDK reports `completed`.
    pub fn credit_ad_reward(&mut self, config: &EconomyConfig, completed: bool) -> bool {
        if !completed {
            return false;
        }
        self.add_coins(config.ad_coins_reward);
        true
    }

    /// Shop purchase (store billing happens outside this crate)
    pub fn purchase_pack(&mut self, config: &EconomyConfig, pack: CoinPack) {
        let amount = config.pack_coins(pack);
        log::info!("Purchased {} pack (+{} coins)", pack.as_str(), amount);
        self.add_coins(amount);
    }

    fn notify(&mut self) {
        let coins = self.coins();
        self.events.emit(GameEvent::CoinsChanged { coins });
    }
}
