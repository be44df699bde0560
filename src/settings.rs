//! Player settings and preferences
//!
//! Persisted inside the save blob so one write covers everything.

use serde::{Deserialize, Serialize};

/// Interface language shown in the settings dropdown
pub const DEFAULT_LANGUAGE: &str = "English";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Haptics ===
    /// Vibrate on answer feedback
    pub vibrate: bool,

    /// Display name of the selected language
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            sfx_volume: 1.0,
            vibrate: true,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Settings {
    /// Clamp volumes into range and fill an empty language
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.music_volume = clamp_volume(self.music_volume, defaults.music_volume);
        self.sfx_volume = clamp_volume(self.sfx_volume, defaults.sfx_volume);

        let trimmed = self.language.trim();
        if trimmed.is_empty() {
            self.language = defaults.language;
        } else if trimmed.len() != self.language.len() {
            self.language = trimmed.to_string();
        }
        self
    }

    /// Effective music volume (0 when muted by the host, e.g. app in background)
    pub fn effective_music_volume(&self, muted: bool) -> f32 {
        if muted { 0.0 } else { self.music_volume }
    }

    /// Effective sfx volume
    pub fn effective_sfx_volume(&self, muted: bool) -> f32 {
        if muted { 0.0 } else { self.sfx_volume }
    }
}

fn clamp_volume(v: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_clamps_volumes() {
        let s = Settings {
            music_volume: 1.7,
            sfx_volume: -0.2,
            vibrate: false,
            language: "  French ".to_string(),
        }
        .sanitized();

        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.0);
        assert_eq!(s.language, "French");
        assert!(!s.vibrate);
    }

    #[test]
    fn test_sanitized_nan_and_empty_language() {
        let s = Settings {
            music_volume: f32::NAN,
            language: String::new(),
            ..Default::default()
        }
        .sanitized();

        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"sfxVolume":0.25}"#).unwrap();
        assert_eq!(s.sfx_volume, 0.25);
        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_effective_volume_when_muted() {
        let s = Settings::default();
        assert_eq!(s.effective_music_volume(true), 0.0);
        assert_eq!(s.effective_sfx_volume(false), 1.0);
    }
}
