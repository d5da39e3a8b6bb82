use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::persisted::{Settings, SettingsBlob, SETTINGS_VERSION};
use codenames_core::{decode, encode};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] io::Error),
    #[error("settings could not be encoded")]
    Encode,
}

/// Where settings live between sessions. Loading never fails; anything
/// unreadable falls back to defaults.
pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    saved: RefCell<Option<Settings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            saved: RefCell::new(Some(settings)),
        }
    }

    pub fn saved(&self) -> Option<Settings> {
        *self.saved.borrow()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Settings {
        self.saved.borrow().unwrap_or_default()
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.saved.borrow_mut() = Some(*settings);
        Ok(())
    }
}

/// Settings blob in a single file, written whole on every save.
#[derive(Clone, Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Settings::default(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "settings unreadable");
                return Settings::default();
            }
        };
        match decode::<SettingsBlob>(&bytes) {
            Some(blob) if blob.version == SETTINGS_VERSION => blob.settings,
            Some(blob) => {
                debug!(version = blob.version, "settings version mismatch");
                Settings::default()
            }
            None => {
                warn!(path = %self.path.display(), "settings blob corrupt");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let bytes = encode(&SettingsBlob::new(*settings)).ok_or(SettingsError::Encode)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}
