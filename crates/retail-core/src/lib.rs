//! # retail-core: Pure Business Logic for Retail Flow
//!
//! This crate is the **heart** of Retail Flow. It owns the role-based
//! permission table and the domain state engine, both as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Retail Flow Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI (collaborator)                    │   │
//! │  │   POS ── Sales ── Refunds ── Inventory ── Procurement ── Admin  │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │          can_perform()                      dispatch(Action)            │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │   permissions (registry)    │  │   retail-store (Dispatcher)      │  │
//! │  └─────────────────────────────┘  └────────────┬────────────────────┘  │
//! │                                                │ apply(state, action)   │
//! │  ┌─────────────────────────────────────────────▼───────────────────┐   │
//! │  │               ★ retail-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money   │ │   cart   │ │ engine / action  │  │   │
//! │  │   │ Product  │ │  Money   │ │  Cart    │ │ apply()          │  │   │
//! │  │   │ Sale, PO │ │ TaxRate  │ │ Parked   │ │ AppState         │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RANDOMNESS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`permissions`] - Role → permission table and access checks
//! - [`types`] - Domain entities (Product, Sale, PurchaseOrder, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Transient cart and parked-sale queue
//! - [`state`] - The application state container and lookups
//! - [`action`] - The closed set of state transitions
//! - [`engine`] - The transition function with invariant enforcement
//! - [`reports`] - Sales / cost / profit summaries
//! - [`seed`] - Demo dataset
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validators
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use retail_core::{apply, can_perform, Action, AppState, Permission, Role};
//!
//! let state = AppState::seeded(Utc::now());
//! assert!(can_perform(Some(Role::Manager), Permission::ProcurementManage));
//!
//! let next = apply(&state, &Action::SetRole(Role::Manager)).unwrap();
//! assert_eq!(next.role, Some(Role::Manager));
//! ```

pub mod action;
pub mod cart;
pub mod engine;
pub mod error;
pub mod money;
pub mod permissions;
pub mod reports;
pub mod seed;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use action::{Action, PurchaseOrderStatusUpdate, ReceiptStamp, StockUpdate};
pub use cart::{Cart, ParkedSales};
pub use engine::apply;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use permissions::{
    accessible_areas, can_perform, can_perform_key, AppArea, Permission, PermissionRegistry,
};
pub use reports::ReportSummary;
pub use state::AppState;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Refunds above this total need `pos.approve_high_value_refund`.
pub const REFUND_APPROVAL_LIMIT: Money = Money::from_cents(5_000);
