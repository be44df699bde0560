//! Notifications for the presentation layer
//!
//! Delivered synchronously to every listener at the moment of the change.
//! Nothing is queued or retried.

use crate::outcome::RoundOutcome;

/// Something the UI may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Coin balance changed (emitted after the save)
    CoinsChanged { coins: u32 },
    /// A round finished
    RoundOutcome(RoundOutcome),
    /// A category's watermark rose to `level`
    LevelUnlocked { category_id: String, level: u32 },
    /// A category's completion percentage changed
    CategoryProgressChanged { category_id: String, percent: f32 },
}

/// Handle returned by `EventBus::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Fan-out of events to registered callbacks
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::debug!("Event: {:?}", event);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
