//! Active-language store.
//!
//! Holds the process-wide language selection. There is one writer (`set`)
//! and any number of subscribers; readers always see a whole committed
//! value. When a storage file is configured, the selection is rehydrated
//! from it at startup and written back on every change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::i18n::{Language, LanguageError};

/// On-disk shape of the persisted selection.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedLanguage {
    language: Language,
}

pub struct LanguageStore {
    tx: watch::Sender<Language>,
    storage_path: Option<PathBuf>,
}

impl LanguageStore {
    /// In-memory store starting at `initial`, or at the default language
    /// when `initial` cannot be selected.
    pub fn new(initial: Language) -> Self {
        let initial = initial.ensure_selectable().unwrap_or_else(|e| {
            warn!("{}, starting with the default language", e);
            Language::default_language()
        });
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            storage_path: None,
        }
    }

    /// Rehydrate from `path`, falling back to `fallback` when the file is
    /// missing or does not hold a selectable tag.
    pub fn load(path: impl Into<PathBuf>, fallback: Language) -> Self {
        let path = path.into();
        let initial = match read_persisted(&path) {
            Some(language) => {
                info!(
                    "Rehydrated active language '{}' from {}",
                    language,
                    path.display()
                );
                language
            }
            None => {
                debug!(
                    "No persisted language at {}, using '{}'",
                    path.display(),
                    fallback
                );
                fallback
            }
        };
        let initial = initial
            .ensure_selectable()
            .unwrap_or_else(|_| Language::default_language());

        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            storage_path: Some(path),
        }
    }

    /// Current selection.
    pub fn get(&self) -> Language {
        *self.tx.borrow()
    }

    /// Commit a new selection and broadcast it to subscribers. Languages
    /// that are not selectable are refused and leave the selection as is.
    ///
    /// Persisting is best effort: a write failure is logged and the in-memory
    /// selection still changes.
    pub fn set(&self, language: Language) -> Result<(), LanguageError> {
        let language = language.ensure_selectable()?;
        let previous = self.tx.send_replace(language);
        if previous != language {
            info!("Active language changed: {} -> {}", previous, language);
        }

        if let Some(path) = &self.storage_path {
            if let Err(e) = write_persisted(path, language) {
                warn!(
                    "Failed to persist language '{}' to {}: {}",
                    language,
                    path.display(),
                    e
                );
            }
        }
        Ok(())
    }

    /// Receive every committed selection from now on.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.tx.subscribe()
    }
}

impl Default for LanguageStore {
    fn default() -> Self {
        Self::new(Language::default_language())
    }
}

fn read_persisted(path: &Path) -> Option<Language> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<PersistedLanguage>(&raw) {
        Ok(persisted) => match persisted.language.ensure_selectable() {
            Ok(language) => Some(language),
            Err(e) => {
                warn!("Ignoring language file {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            warn!("Ignoring unreadable language file {}: {}", path.display(), e);
            None
        }
    }
}

fn write_persisted(path: &Path, language: Language) -> anyhow::Result<()> {
    let body = serde_json::to_string(&PersistedLanguage { language })?;
    std::fs::write(path, body)?;
    Ok(())
}
