use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Player,
    Codemaster,
}

impl Role {
    pub fn is_codemaster(self) -> bool {
        self == Role::Codemaster
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKey {
    ColorBlind,
    DarkMode,
    Fullscreen,
    SpymasterMayGuess,
}

impl SettingKey {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "colorblind" => Some(SettingKey::ColorBlind),
            "darkmode" => Some(SettingKey::DarkMode),
            "fullscreen" => Some(SettingKey::Fullscreen),
            "spymastermayguess" => Some(SettingKey::SpymasterMayGuess),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Local intents raised by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreAction {
    Guess { index: usize },
    EndTurn,
    NextGame { confirmed: bool },
    SetRole(Role),
    ToggleSetting(SettingKey),
    ToggleSettingsView,
    KeyDown(Key),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Guess,
    EndTurn,
    NextGame,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Guess => "guess",
            ActionKind::EndTurn => "end-turn",
            ActionKind::NextGame => "next-game",
        };
        f.write_str(name)
    }
}

/// Why a mutating action was dropped before reaching the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NoSnapshot,
    GameFinished,
    AlreadyRevealed,
    OutOfRange,
    CodemasterMayNotGuess,
    GuessInFlight,
    NeedsConfirmation,
    TornDown,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoSnapshot => "no game loaded yet",
            SkipReason::GameFinished => "game is over",
            SkipReason::AlreadyRevealed => "word already revealed",
            SkipReason::OutOfRange => "no such word",
            SkipReason::CodemasterMayNotGuess => "spymasters may not guess",
            SkipReason::GuessInFlight => "guess already sent",
            SkipReason::NeedsConfirmation => "current game is unfinished",
            SkipReason::TornDown => "session closed",
        };
        f.write_str(text)
    }
}
