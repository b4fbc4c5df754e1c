//! # retail-store: Live State for Retail Flow
//!
//! Owns the one authoritative [`retail_core::AppState`] and everything the
//! pure core refuses to do: read configuration, touch the filesystem,
//! mint document numbers, log, and decide who may dispatch what.
//!
//! ## Module Organization
//! ```text
//! retail_store/
//! ├── dispatcher.rs   # Single writer: authorize ► apply ► swap
//! ├── role.rs         # Last-selected role on disk
//! ├── config.rs       # StoreConfig (defaults < store.toml < env)
//! ├── ids.rs          # INV-/PARK-/ADJ-/PO-/GRN-/REF- numbers
//! └── error.rs        # StoreError
//! ```
//!
//! ## Startup
//! ```rust,no_run
//! use chrono::Utc;
//! use retail_store::{init_tracing, Dispatcher, StoreConfig};
//!
//! init_tracing();
//! let config = StoreConfig::load_or_default(None);
//! let dispatcher = Dispatcher::from_config(&config, Utc::now());
//! println!("{} products", dispatcher.state().products.len());
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod role;

pub use config::StoreConfig;
pub use dispatcher::Dispatcher;
pub use error::{StoreError, StoreResult};
pub use role::RoleStore;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=retail_store=trace` - Trace the dispatcher only
/// - Default: INFO, DEBUG for the retail crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,retail=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
