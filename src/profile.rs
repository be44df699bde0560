//! Player profile: nickname "login" and settings

use crate::consts::DEFAULT_PLAYER_NAME;
use crate::persistence::SaveStore;
use crate::settings::Settings;

pub struct Profile<'a> {
    store: &'a mut SaveStore,
}

impl<'a> Profile<'a> {
    pub fn new(store: &'a mut SaveStore) -> Self {
        Self { store }
    }

    pub fn player_name(&self) -> &str {
        self.store.data().player_name()
    }

    /// A non-empty name means the player has logged in
    pub fn is_logged_in(&self) -> bool {
        !self.player_name().is_empty()
    }

    /// Trimmed; an empty nickname becomes the default name
    pub fn set_player_name(&mut self, name: &str) {
        let name = match name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            trimmed => trimmed,
        };
        self.store.data_mut().player_name = name.to_string();
        self.store.save();
        log::info!("Player name set to '{}'", name);
    }

    pub fn settings(&self) -> &Settings {
        self.store.data().settings()
    }

    pub fn set_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        log::info!(
            "Settings saved: music={:.2}, sfx={:.2}, vibrate={}, lang={}",
            settings.music_volume,
            settings.sfx_volume,
            settings.vibrate,
            settings.language
        );
        self.store.data_mut().settings = settings;
        self.store.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_login_flow() {
        let mut store = SaveStore::open(Box::new(MemoryStore::new()));
        let mut profile = Profile::new(&mut store);
        assert!(!profile.is_logged_in());

        profile.set_player_name("   ");
        assert_eq!(profile.player_name(), DEFAULT_PLAYER_NAME);

        profile.set_player_name("  Mia ");
        assert_eq!(profile.player_name(), "Mia");
        assert!(profile.is_logged_in());

        store.load();
        assert_eq!(store.data().player_name(), "Mia");
    }

    #[test]
    fn test_settings_sanitized_and_persisted() {
        let mut store = SaveStore::open(Box::new(MemoryStore::new()));
        Profile::new(&mut store).set_settings(Settings {
            music_volume: 3.0,
            sfx_volume: 0.5,
            vibrate: false,
            language: "Japanese".into(),
        });

        store.load();
        let s = store.data().settings();
        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.5);
        assert_eq!(s.language, "Japanese");
    }
}
