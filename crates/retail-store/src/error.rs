//! # Store Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Authorization  │  │     Domain      │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Unauthorized   │  │  Core(..)       │  │  InvalidConfig          │ │
//! │  │                 │  │  Decode         │  │  ConfigLoad / Save      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │   Filesystem    │                                                    │
//! │  │  Io             │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use retail_core::{CoreError, Permission, Role};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Authorization
    // =========================================================================
    /// The current role lacks a permission the action needs.
    #[error("{} requires {}, which {} does not have", .action, .permission, describe_role(.role))]
    Unauthorized {
        action: &'static str,
        role: Option<Role>,
        permission: Permission,
    },

    // =========================================================================
    // Domain
    // =========================================================================
    /// The engine rejected the transition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A dispatched action could not be decoded.
    #[error("Malformed action: {0}")]
    Decode(String),

    // =========================================================================
    // Configuration
    // =========================================================================
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Filesystem
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_role(role: &Option<Role>) -> String {
    match role {
        Some(role) => format!("role {}", role),
        None => "an unselected role".to_string(),
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl StoreError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StoreError::Unauthorized { .. })
    }

    /// True when the engine rejected the action on its merits; the caller
    /// can correct the input and retry.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Core(_))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_)
                | StoreError::ConfigLoadFailed(_)
                | StoreError::ConfigSaveFailed(_)
        )
    }
}
