use serde::Serialize;

use codenames_core::SettingKey;

pub(crate) const SETTINGS_VERSION: u32 = 1;

/// Viewer preferences that outlive a session.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
pub struct Settings {
    pub color_blind: bool,
    pub dark_mode: bool,
    pub fullscreen: bool,
    pub spymaster_may_guess: bool,
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::ColorBlind => self.color_blind,
            SettingKey::DarkMode => self.dark_mode,
            SettingKey::Fullscreen => self.fullscreen,
            SettingKey::SpymasterMayGuess => self.spymaster_may_guess,
        }
    }

    pub fn toggle(&mut self, key: SettingKey) {
        let slot = match key {
            SettingKey::ColorBlind => &mut self.color_blind,
            SettingKey::DarkMode => &mut self.dark_mode,
            SettingKey::Fullscreen => &mut self.fullscreen,
            SettingKey::SpymasterMayGuess => &mut self.spymaster_may_guess,
        };
        *slot = !*slot;
    }
}

#[derive(Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct SettingsBlob {
    pub(crate) version: u32,
    pub(crate) settings: Settings,
}

impl SettingsBlob {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            version: SETTINGS_VERSION,
            settings,
        }
    }
}

impl Default for SettingsBlob {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
