//! Emergency-access affordance.
//!
//! # Responsibilities
//! - Read the persisted login-failure counter
//! - Decide whether the redirect notice offers the emergency-access link
//!
//! # Design Decisions
//! - Configuration is injected, never read from ambient globals
//! - The counter is not an input to access decisions
//! - An unreadable store counts as zero failures

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::EmergencyConfig;
use crate::error::GuardError;

/// Source of the persisted `login_error_count`.
pub trait LoginErrorStore: Send + Sync {
    fn login_error_count(&self) -> Result<u32, GuardError>;
}

/// Counter held in process memory.
#[derive(Debug, Default)]
pub struct MemoryLoginErrorStore {
    count: AtomicU32,
}

impl MemoryLoginErrorStore {
    pub fn new(count: u32) -> Self {
        Self {
            count: AtomicU32::new(count),
        }
    }

    pub fn record_failure(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

impl LoginErrorStore for MemoryLoginErrorStore {
    fn login_error_count(&self) -> Result<u32, GuardError> {
        Ok(self.count.load(Ordering::Relaxed))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCounter {
    login_error_count: u32,
}

/// Counter persisted as a small JSON document.
#[derive(Debug, Clone)]
pub struct FileLoginErrorStore {
    path: PathBuf,
}

impl FileLoginErrorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<StoredCounter, GuardError> {
        if !self.path.exists() {
            return Ok(StoredCounter::default());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn save(&self, counter: &StoredCounter) -> Result<(), GuardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut writer, counter)?;
        writer.flush()?;
        Ok(())
    }

    /// Increment the persisted counter and return the new value.
    pub fn record_failure(&self) -> Result<u32, GuardError> {
        let mut counter = self.load()?;
        counter.login_error_count = counter.login_error_count.saturating_add(1);
        self.save(&counter)?;
        Ok(counter.login_error_count)
    }

    pub fn reset(&self) -> Result<(), GuardError> {
        self.save(&StoredCounter::default())
    }
}

impl LoginErrorStore for FileLoginErrorStore {
    fn login_error_count(&self) -> Result<u32, GuardError> {
        Ok(self.load()?.login_error_count)
    }
}

/// Injected emergency-access settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyAccess {
    enabled: bool,
    failure_threshold: u32,
    path: String,
}

impl EmergencyAccess {
    pub fn from_config(config: &EmergencyConfig) -> Self {
        Self {
            enabled: config.enabled,
            failure_threshold: config.failure_threshold,
            path: config.path.clone(),
        }
    }

    pub fn disabled() -> Self {
        Self::from_config(&EmergencyConfig::default())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if the emergency-access link should be offered.
    pub fn should_offer(&self, store: &dyn LoginErrorStore) -> bool {
        if !self.enabled {
            return false;
        }
        let count = store.login_error_count().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Login error counter unreadable, assuming zero");
            0
        });
        count >= self.failure_threshold
    }
}
