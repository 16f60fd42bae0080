// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! First-visit keyboard hint ("press / to search").
//!
//! Shown until dismissed, then never again. The dismissal is one flag in a
//! key-value store. Storage can be unavailable (private browsing, a read-only
//! home directory); when reading fails we show the hint, and when writing
//! fails we hide it anyway and move on.

use crate::config::HintOptions;
use crate::error::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Value stored under the hint key once dismissed.
pub const DISMISSED: &str = "1";

/// Minimal string key-value storage.
pub trait FlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store. `denied()` builds one that refuses every access.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    values: HashMap<String, String>,
    denied: bool,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denied() -> Self {
        Self {
            values: HashMap::new(),
            denied: true,
        }
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.denied {
            return Err(StoreError::Denied(key.to_string()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.denied {
            return Err(StoreError::Denied(key.to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk, one string value per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl FlagStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

/// The hint banner and its auto-hide timer.
pub struct HintBanner {
    store: Box<dyn FlagStore + Send>,
    key: String,
    visible: bool,
    hide_at: Option<Instant>,
}

impl HintBanner {
    /// Decide visibility from the store and start the auto-hide timer.
    pub fn mount(store: Box<dyn FlagStore + Send>, options: &HintOptions) -> Self {
        let dismissed = match store.get(&options.storage_key) {
            Ok(value) => value.as_deref() == Some(DISMISSED),
            Err(e) => {
                warn!(error = %e, "hint flag unreadable, showing hint");
                false
            }
        };
        let visible = !dismissed;
        Self {
            store,
            key: options.storage_key.clone(),
            visible,
            hide_at: visible.then(|| Instant::now() + options.timeout()),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide once the timer has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.hide_at.is_some_and(|deadline| now >= deadline) {
            self.visible = false;
            self.hide_at = None;
        }
    }

    /// User closed the hint: hide and remember.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.hide_at = None;
        if let Err(e) = self.store.set(&self.key, DISMISSED) {
            warn!(error = %e, "could not persist hint dismissal");
        }
    }

    /// Cancel the timer without touching visibility or storage.
    pub fn teardown(&mut self) {
        self.hide_at = None;
    }

    pub fn has_timer(&self) -> bool {
        self.hide_at.is_some()
    }
}

impl std::fmt::Debug for HintBanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintBanner")
            .field("key", &self.key)
            .field("visible", &self.visible)
            .field("hide_at", &self.hide_at)
            .finish_non_exhaustive()
    }
}
