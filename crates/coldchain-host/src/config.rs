//! # Host Configuration
//!
//! Where the ledger lives and how many notifications may queue between drains.
//! Values come from the environment and are overridden by command-line flags.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default ledger file.
pub const DEFAULT_LEDGER_PATH: &str = "./data/ledger.bin";

/// Largest capacity the broadcast channel accepts.
pub const MAX_EVENT_CAPACITY: usize = usize::MAX / 2;

/// Default notification queue capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = coldchain_registry::adapters::DEFAULT_EVENT_CAPACITY;

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Ledger file for the durable ledger.
    pub ledger_path: PathBuf,
    /// Use an in-memory ledger that is discarded on exit.
    pub ephemeral: bool,
    /// Capacity of the notification channel.
    pub event_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            ephemeral: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No ledger path for a durable run.
    #[error("ledger path is empty; set COLDCHAIN_LEDGER_PATH or pass --ledger")]
    EmptyLedgerPath,

    /// A zero-capacity channel cannot hold a single notification.
    #[error("event capacity must be at least 1")]
    ZeroEventCapacity,

    /// Above what the broadcast channel can allocate.
    #[error("event capacity {capacity} exceeds the maximum of {max}")]
    EventCapacityTooLarge { capacity: usize, max: usize },
}

impl HostConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `COLDCHAIN_LEDGER_PATH`: Ledger file (default: ./data/ledger.bin)
    /// - `COLDCHAIN_EVENT_CAPACITY`: Notification queue capacity (default: 1000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            ledger_path: lookup("COLDCHAIN_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH)),
            ephemeral: false,
            event_capacity: lookup("COLDCHAIN_EVENT_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }

    /// Apply command-line overrides. `None` keeps the current value.
    #[must_use]
    pub fn with_overrides(
        mut self,
        ledger_path: Option<PathBuf>,
        ephemeral: bool,
        event_capacity: Option<usize>,
    ) -> Self {
        if let Some(path) = ledger_path {
            self.ledger_path = path;
        }
        self.ephemeral |= ephemeral;
        if let Some(capacity) = event_capacity {
            self.event_capacity = capacity;
        }
        self
    }

    /// Check the configuration before opening anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        if self.event_capacity > MAX_EVENT_CAPACITY {
            return Err(ConfigError::EventCapacityTooLarge {
                capacity: self.event_capacity,
                max: MAX_EVENT_CAPACITY,
            });
        }
        if !self.ephemeral && self.ledger_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyLedgerPath);
        }
        Ok(())
    }
}
