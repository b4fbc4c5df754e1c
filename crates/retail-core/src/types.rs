//! # Domain Types
//!
//! Entities owned by the domain state engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────┐   ┌───────────────┐   ┌────────────────────────┐    │
//! │  │    Product    │◄──│   CartItem    │◄──│  Sale                  │    │
//! │  │  id = SKU     │   │  productId    │   │  invoiceNumber         │    │
//! │  │  stock        │   │  unitPrice ❄  │   │  payment {cash, card}  │    │
//! │  └───────▲───────┘   └───────────────┘   └────────────────────────┘    │
//! │          │                                                              │
//! │  ┌───────┴───────────┐  ┌──────────────────┐  ┌──────────────────┐     │
//! │  │ PurchaseOrderItem │◄─│  PurchaseOrder   │◄─│ GoodsReceiptNote │     │
//! │  │  costPrice ❄      │  │ Draft→Ordered→   │  │  poId            │     │
//! │  └───────────────────┘  │       Received   │  └──────────────────┘     │
//! │                         └──────────────────┘                            │
//! │  ┌──────────────────┐  ┌──────────────┐  ┌──────────┐  ┌──────────┐    │
//! │  │ StockAdjustment  │  │   Refund     │  │ Supplier │  │  User    │    │
//! │  │ quantityChange ± │  │ invoice ref  │  └──────────┘  │  Role    │    │
//! │  └──────────────────┘  └──────────────┘                └──────────┘    │
//! │                                                                         │
//! │  ❄ = snapshot frozen when the line was created                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase so snapshots line up with what the
//! browser collaborator already renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (500 = 5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Role
// =============================================================================

/// Staff role. A classification tag, not an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Role {
    Cashier,
    Manager,
    Owner,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Cashier, Role::Manager, Role::Owner];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Cashier => "Cashier",
            Role::Manager => "Manager",
            Role::Owner => "Owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cashier" => Ok(Role::Cashier),
            "manager" => Ok(Role::Manager),
            "owner" => Ok(Role::Owner),
            _ => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", s.trim()),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// A staff account. Never removed; only its status may differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub role: Role,
    pub status: UserStatus,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TaxClass {
    #[default]
    Standard,
    Reduced,
    Zero,
}

/// A stocked product, keyed by SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stock Keeping Unit - the unique key.
    pub id: String,
    pub barcode: String,
    pub name: String,
    pub category: String,
    pub tax_class: TaxClass,
    pub cost_price: Money,
    pub selling_price: Money,
    pub reorder_level: i64,
    /// Units on hand. The engine never lets this go below zero.
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// True once stock has fallen to the reorder level.
    pub fn needs_reorder(&self) -> bool {
        self.stock <= self.reorder_level
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A sold (or to-be-sold) line.
///
/// `unit_price` is a snapshot taken when the line was created, so later
/// price edits never change an open cart or a logged sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl CartItem {
    /// quantity × unit price, saturating. For display.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Exact sum of line totals.
///
/// Lines arrive from the UI unchecked, so a total that does not fit in
/// cents is rejected rather than wrapped or saturated.
///
/// ```rust
/// use retail_core::{items_total, CartItem, Money};
///
/// let lines = vec![CartItem {
///     product_id: "SKU001".to_string(),
///     quantity: 2,
///     unit_price: Money::from_cents(i64::MAX / 2 + 1),
/// }];
/// assert!(items_total(&lines).is_err());
/// ```
pub fn items_total(items: &[CartItem]) -> CoreResult<Money> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        item.unit_price
            .checked_mul(item.quantity)
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(|| CoreError::out_of_range("total"))
    })
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SaleStatus {
    /// Paid while online.
    Completed,
    /// Set aside before payment; lives in the POS park queue.
    Parked,
    /// Paid while offline. Only a label: nothing retries it.
    #[serde(rename = "Pending Sync")]
    PendingSync,
}

impl SaleStatus {
    /// Status a paid sale gets for the current connectivity flag.
    pub const fn for_connectivity(online: bool) -> Self {
        if online {
            SaleStatus::Completed
        } else {
            SaleStatus::PendingSync
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaleStatus::Completed => "Completed",
            SaleStatus::Parked => "Parked",
            SaleStatus::PendingSync => "Pending Sync",
        })
    }
}

/// Cash / card split of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentSplit {
    pub cash: Money,
    pub card: Money,
}

impl PaymentSplit {
    pub const fn cash(cash: Money) -> Self {
        PaymentSplit {
            cash,
            card: Money::zero(),
        }
    }

    /// cash + card, saturating.
    pub fn total_paid(&self) -> Money {
        self.cash.saturating_add(self.card)
    }

    pub fn covers(&self, total: Money) -> bool {
        self.total_paid() >= total
    }

    /// Cash handed back: `max(0, cash - (total - card))`.
    ///
    /// ```rust
    /// use retail_core::{Money, PaymentSplit};
    ///
    /// let payment = PaymentSplit::cash(Money::from_cents(1000));
    /// assert_eq!(payment.change_due(Money::from_cents(747)).cents(), 253);
    /// ```
    pub fn change_due(&self, total: Money) -> Money {
        self.cash
            .saturating_sub(total.saturating_sub(self.card))
            .floor_zero()
    }
}

/// An entry of the append-only sales log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub invoice_number: String,
    pub items: Vec<CartItem>,
    pub total: Money,
    pub payment: PaymentSplit,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub status: SaleStatus,
}

impl Sale {
    pub fn computed_total(&self) -> CoreResult<Money> {
        items_total(&self.items)
    }

    pub fn change_due(&self) -> Money {
        self.payment.change_due(self.total)
    }

    /// Units of `product_id` on this invoice.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }
}

// =============================================================================
// Refund
// =============================================================================

/// Goods returned against a logged sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Refund {
    pub id: String,
    pub original_invoice_number: String,
    pub items: Vec<CartItem>,
    pub total: Money,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    /// User id of the staff member who processed it.
    pub processed_by: u32,
}

impl Refund {
    pub fn requires_approval(&self) -> bool {
        self.total > crate::REFUND_APPROVAL_LIMIT
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    pub id: u32,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
}

// =============================================================================
// Purchase Orders
// =============================================================================

/// Purchase order lifecycle.
///
/// ```text
///   Draft ──────► Ordered ──────► Received
///  (initial)                      (terminal)
/// ```
/// No self-transitions, no skips, no backward moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PurchaseOrderStatus {
    #[default]
    Draft,
    Ordered,
    Received,
}

impl PurchaseOrderStatus {
    pub const fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        matches!(
            (self, next),
            (PurchaseOrderStatus::Draft, PurchaseOrderStatus::Ordered)
                | (PurchaseOrderStatus::Ordered, PurchaseOrderStatus::Received)
        )
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Received)
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PurchaseOrderStatus::Draft => "Draft",
            PurchaseOrderStatus::Ordered => "Ordered",
            PurchaseOrderStatus::Received => "Received",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseOrderItem {
    pub product_id: String,
    pub quantity: i64,
    /// Cost price when the line was added.
    pub cost_price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseOrder {
    pub id: String,
    pub supplier_id: u32,
    pub items: Vec<PurchaseOrderItem>,
    pub status: PurchaseOrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub ordered_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    pub fn total_cost(&self) -> Money {
        self.items
            .iter()
            .map(|i| i.cost_price.multiply_quantity(i.quantity))
            .sum()
    }
}

/// Record that a purchase order's goods arrived. One per PO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GoodsReceiptNote {
    pub id: String,
    pub po_id: String,
    pub received_items: Vec<PurchaseOrderItem>,
    #[ts(as = "String")]
    pub received_at: DateTime<Utc>,
    /// User id of the receiver.
    pub received_by: u32,
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// Manual stock correction (spoilage, theft, recount).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockAdjustment {
    pub id: String,
    pub product_id: String,
    /// Signed, never zero.
    pub quantity_change: i64,
    pub reason: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub user_id: u32,
}

impl StockAdjustment {
    /// Reason recorded when the form leaves it blank.
    pub const DEFAULT_REASON: &'static str = "Manual Adjustment";
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!(" manager ".parse::<Role>().unwrap(), Role::Manager);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_po_transitions() {
        use PurchaseOrderStatus::*;

        assert!(Draft.can_transition_to(Ordered));
        assert!(Ordered.can_transition_to(Received));

        assert!(!Draft.can_transition_to(Received));
        assert!(!Draft.can_transition_to(Draft));
        assert!(!Ordered.can_transition_to(Draft));
        assert!(!Received.can_transition_to(Ordered));
        assert!(!Received.can_transition_to(Received));
        assert!(Received.is_terminal());
    }

    #[test]
    fn test_change_due() {
        let total = Money::from_cents(747);

        let cash_only = PaymentSplit::cash(Money::from_cents(1000));
        assert_eq!(cash_only.change_due(total), Money::from_cents(253));

        let split = PaymentSplit {
            cash: Money::from_cents(500),
            card: Money::from_cents(300),
        };
        assert_eq!(split.change_due(total), Money::from_cents(53));

        let card_only = PaymentSplit {
            cash: Money::zero(),
            card: total,
        };
        assert_eq!(card_only.change_due(total), Money::zero());
    }

    #[test]
    fn test_huge_payment_saturates() {
        let payment = PaymentSplit {
            cash: Money::from_cents(i64::MAX),
            card: Money::from_cents(i64::MAX),
        };
        assert_eq!(payment.total_paid(), Money::from_cents(i64::MAX));
        assert!(payment.covers(Money::from_cents(i64::MAX)));
        assert_eq!(payment.change_due(Money::zero()), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_items_total_rejects_overflow() {
        let line = |quantity, cents| CartItem {
            product_id: "SKU001".to_string(),
            quantity,
            unit_price: Money::from_cents(cents),
        };

        assert_eq!(
            items_total(&[line(2, 99), line(1, 549)]),
            Ok(Money::from_cents(747))
        );
        assert!(matches!(
            items_total(&[line(2, i64::MAX / 2 + 1)]),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(items_total(&[line(1, i64::MAX), line(1, 1)]).is_err());
    }

    #[test]
    fn test_sale_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&SaleStatus::PendingSync).unwrap(),
            "\"Pending Sync\""
        );
        assert_eq!(SaleStatus::for_connectivity(true), SaleStatus::Completed);
        assert_eq!(SaleStatus::for_connectivity(false), SaleStatus::PendingSync);
    }

    #[test]
    fn test_needs_reorder() {
        let mut product = Product {
            id: "SKU005".to_string(),
            barcode: "5678901234567".to_string(),
            name: "Wireless Mouse".to_string(),
            category: "Electronics".to_string(),
            tax_class: TaxClass::Standard,
            cost_price: Money::from_cents(1500),
            selling_price: Money::from_cents(2999),
            reorder_level: 10,
            stock: 25,
            image_url: None,
        };
        assert!(!product.needs_reorder());

        product.stock = 10;
        assert!(product.needs_reorder());
    }

    #[test]
    fn test_product_json_is_camel_case() {
        let item = PurchaseOrderItem {
            product_id: "SKU001".to_string(),
            quantity: 100,
            cost_price: Money::from_cents(50),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "SKU001");
        assert_eq!(json["costPrice"], 50);
    }
}
