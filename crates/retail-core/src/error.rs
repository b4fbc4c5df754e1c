//! # Error Types
//!
//! Domain-specific error types for retail-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  retail-core errors (this file)                                         │
//! │  ├── CoreError        - Rejected transitions, lookups, business rules   │
//! │  └── ValidationError  - Field-level input failures                      │
//! │                                                                         │
//! │  retail-store errors (separate crate)                                   │
//! │  └── StoreError       - Authorization denials, persistence, config      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → UI collaborator       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant carries enough context (SKU, PO id, amounts) for the UI
//! to render a message without re-querying state. Nothing here is fatal:
//! the caller corrects the input and dispatches again.

use thiserror::Error;

use crate::money::Money;
use crate::types::{PurchaseOrderStatus, SaleStatus};

// =============================================================================
// Core Error
// =============================================================================

/// A transition the engine refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product SKU does not resolve.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Supplier not found: {0}")]
    SupplierNotFound(u32),

    #[error("User not found: {0}")]
    UserNotFound(u32),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    #[error("Purchase order not found: {0}")]
    PurchaseOrderNotFound(String),

    /// A sale or cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cash plus card does not cover the total.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart total $7.47
    ///      │
    ///      ▼
    /// Payment { cash: $5.00, card: $0.00 }
    ///      │
    ///      ▼
    /// InsufficientPayment { required: $7.47, paid: $5.00 }
    ///      │
    ///      ▼
    /// UI shows: "Paid: $5.00, Required: $7.47"
    /// ```
    #[error("Insufficient payment: paid {paid}, required {required}")]
    InsufficientPayment { required: Money, paid: Money },

    /// The stated sale or refund total disagrees with its lines.
    #[error("Total {stated} does not match line total {computed}")]
    TotalMismatch { stated: Money, computed: Money },

    /// Selling more units than are on hand.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// A stock write would leave the product below zero.
    #[error("Stock for {sku} cannot go below zero (would be {resulting})")]
    NegativeStock { sku: String, resulting: i64 },

    /// Parked sales stay in the POS park queue; they never enter the log.
    #[error("Sale {invoice_number} is {status}, only paid sales can be recorded")]
    InvalidSaleStatus {
        invoice_number: String,
        status: SaleStatus,
    },

    /// PO status moves only Draft → Ordered → Received.
    #[error("Purchase order {po_id} cannot move from {from} to {to}")]
    InvalidTransition {
        po_id: String,
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    },

    /// Moving a PO to Received needs the goods-receipt stamp.
    #[error("Purchase order {0} can only be received with a goods receipt")]
    ReceiptRequired(String),

    #[error("Purchase order {0} already has a goods receipt")]
    AlreadyReceived(String),

    /// Line is not part of the sale being refunded.
    #[error("Product {sku} was not sold on invoice {invoice_number}")]
    NotOnInvoice { invoice_number: String, sku: String },

    #[error("Cannot refund {requested} of {sku}: only {refundable} left on the invoice")]
    RefundExceedsSale {
        sku: String,
        refundable: i64,
        requested: i64,
    },

    /// Refund lines are priced at what the customer paid on the invoice.
    #[error("Product {sku} was not sold at {unit_price} on invoice {invoice_number}")]
    RefundPriceMismatch {
        invoice_number: String,
        sku: String,
        unit_price: Money,
    },

    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    #[error("Product {0} not in cart")]
    NotInCart(String),

    #[error("Parked sale not found: {0}")]
    ParkedSaleNotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business rule runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Signed quantities like adjustments must not be zero.
    #[error("{field} must not be zero")]
    MustBeNonZero { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate key (SKU, invoice number, PO id, …).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl CoreError {
    /// A count or amount that does not fit in an i64.
    pub(crate) fn out_of_range(field: &str) -> Self {
        ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into()
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientPayment {
            required: Money::from_cents(747),
            paid: Money::from_cents(500),
        };
        assert_eq!(err.to_string(), "Insufficient payment: paid $5.00, required $7.47");

        let err = CoreError::InvalidTransition {
            po_id: "PO-002".to_string(),
            from: PurchaseOrderStatus::Draft,
            to: PurchaseOrderStatus::Received,
        };
        assert_eq!(
            err.to_string(),
            "Purchase order PO-002 cannot move from Draft to Received"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "username".to_string(),
        };
        assert_eq!(err.to_string(), "username is required");

        let err = ValidationError::Duplicate {
            field: "sku".to_string(),
            value: "SKU001".to_string(),
        };
        assert_eq!(err.to_string(), "sku 'SKU001' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBeNonZero {
            field: "quantityChange".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
