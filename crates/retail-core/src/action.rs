//! # Actions
//!
//! The closed set of state transitions the UI collaborator can request.
//!
//! An action is data only: the caller has already stamped every id and
//! timestamp it carries. On the wire it is the tagged object the browser
//! dispatches:
//!
//! ```json
//! { "type": "UPDATE_PRODUCT_STOCK", "payload": { "productId": "SKU001", "newStock": 115 } }
//! ```
//!
//! Unrecognized tags decode to [`Action::Unknown`], which the engine
//! applies as a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::Permission;
use crate::types::{
    GoodsReceiptNote, Product, PurchaseOrder, PurchaseOrderStatus, Refund, Role, Sale,
    StockAdjustment, Supplier, User,
};

/// Absolute stock write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub product_id: String,
    pub new_stock: i64,
}

/// Caller-stamped fields of the goods receipt created on receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptStamp {
    pub grn_id: String,
    pub received_at: DateTime<Utc>,
    pub received_by: u32,
}

/// Purchase order status change.
///
/// `at` stamps `orderedAt` when moving to Ordered. `receipt` is required
/// when moving to Received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderStatusUpdate {
    pub id: String,
    pub status: PurchaseOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptStamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetRole(Role),
    ToggleOnlineStatus,
    AddSale(Sale),
    UpdateProductStock(StockUpdate),
    AddStockAdjustment(StockAdjustment),
    AddUser(User),
    AddSupplier(Supplier),
    AddProduct(Product),
    UpdateProduct(Product),
    AddPurchaseOrder(PurchaseOrder),
    UpdatePurchaseOrderStatus(PurchaseOrderStatusUpdate),
    AddGrn(GoodsReceiptNote),
    AddRefund(Refund),
    /// Any tag not listed above.
    #[serde(other)]
    Unknown,
}

impl Action {
    const TAGS: &'static [&'static str] = &[
        "SET_ROLE",
        "TOGGLE_ONLINE_STATUS",
        "ADD_SALE",
        "UPDATE_PRODUCT_STOCK",
        "ADD_STOCK_ADJUSTMENT",
        "ADD_USER",
        "ADD_SUPPLIER",
        "ADD_PRODUCT",
        "UPDATE_PRODUCT",
        "ADD_PURCHASE_ORDER",
        "UPDATE_PURCHASE_ORDER_STATUS",
        "ADD_GRN",
        "ADD_REFUND",
    ];

    /// The wire tag, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Action::SetRole(_) => "SET_ROLE",
            Action::ToggleOnlineStatus => "TOGGLE_ONLINE_STATUS",
            Action::AddSale(_) => "ADD_SALE",
            Action::UpdateProductStock(_) => "UPDATE_PRODUCT_STOCK",
            Action::AddStockAdjustment(_) => "ADD_STOCK_ADJUSTMENT",
            Action::AddUser(_) => "ADD_USER",
            Action::AddSupplier(_) => "ADD_SUPPLIER",
            Action::AddProduct(_) => "ADD_PRODUCT",
            Action::UpdateProduct(_) => "UPDATE_PRODUCT",
            Action::AddPurchaseOrder(_) => "ADD_PURCHASE_ORDER",
            Action::UpdatePurchaseOrderStatus(_) => "UPDATE_PURCHASE_ORDER_STATUS",
            Action::AddGrn(_) => "ADD_GRN",
            Action::AddRefund(_) => "ADD_REFUND",
            Action::Unknown => "UNKNOWN",
        }
    }

    /// Decodes a dispatched action.
    ///
    /// An unrecognized `type` yields [`Action::Unknown`] whatever its
    /// payload looks like; a known `type` with a malformed payload is an
    /// error.
    pub fn from_json(json: &str) -> serde_json::Result<Action> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let tag = value.get("type").and_then(serde_json::Value::as_str);

        match tag {
            Some(tag) if !Self::TAGS.contains(&tag) => Ok(Action::Unknown),
            _ => serde_json::from_value(value),
        }
    }

    /// Permissions the current role must hold for this action to be
    /// dispatched.
    ///
    /// ```text
    /// SET_ROLE, TOGGLE_ONLINE_STATUS, UNKNOWN ─► (none)
    /// ADD_SALE ──────────────────────────────► pos.create
    /// UPDATE_PRODUCT_STOCK, ADD/UPDATE_PRODUCT ► inventory.edit
    /// ADD_STOCK_ADJUSTMENT ──────────────────► stock_adjustment.create
    /// ADD_USER ──────────────────────────────► admin.manage_users
    /// ADD_SUPPLIER ──────────────────────────► admin.manage_suppliers
    /// PO actions, ADD_GRN ───────────────────► procurement.manage
    /// ADD_REFUND ────────────────────────────► pos.refunds
    ///                          (+ pos.approve_high_value_refund over $50)
    /// ```
    pub fn required_permissions(&self) -> Vec<Permission> {
        match self {
            Action::SetRole(_) | Action::ToggleOnlineStatus | Action::Unknown => Vec::new(),
            Action::AddSale(_) => vec![Permission::PosCreate],
            Action::UpdateProductStock(_) | Action::AddProduct(_) | Action::UpdateProduct(_) => {
                vec![Permission::InventoryEdit]
            }
            Action::AddStockAdjustment(_) => vec![Permission::StockAdjustmentCreate],
            Action::AddUser(_) => vec![Permission::AdminManageUsers],
            Action::AddSupplier(_) => vec![Permission::AdminManageSuppliers],
            Action::AddPurchaseOrder(_)
            | Action::UpdatePurchaseOrderStatus(_)
            | Action::AddGrn(_) => vec![Permission::ProcurementManage],
            Action::AddRefund(refund) => {
                let mut permissions = vec![Permission::PosRefunds];
                if refund.requires_approval() {
                    permissions.push(Permission::PosApproveHighValueRefund);
                }
                permissions
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::CartItem;
    use chrono::TimeZone;

    fn refund(total_cents: i64) -> Refund {
        Refund {
            id: "REF-1".to_string(),
            original_invoice_number: "INV-2024-002".to_string(),
            items: vec![CartItem {
                product_id: "SKU005".to_string(),
                quantity: 1,
                unit_price: Money::from_cents(total_cents),
            }],
            total: Money::from_cents(total_cents),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            processed_by: 1,
        }
    }

    #[test]
    fn test_wire_format_matches_dispatch_shape() {
        let action = Action::UpdateProductStock(StockUpdate {
            product_id: "SKU001".to_string(),
            new_stock: 115,
        });
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "UPDATE_PRODUCT_STOCK");
        assert_eq!(json["payload"]["productId"], "SKU001");
        assert_eq!(json["payload"]["newStock"], 115);

        let toggle = Action::from_json(r#"{"type":"TOGGLE_ONLINE_STATUS"}"#).unwrap();
        assert_eq!(toggle, Action::ToggleOnlineStatus);

        let role = Action::from_json(r#"{"type":"SET_ROLE","payload":"Manager"}"#).unwrap();
        assert_eq!(role, Action::SetRole(Role::Manager));
    }

    #[test]
    fn test_every_kind_is_a_known_tag() {
        let actions = [
            Action::SetRole(Role::Owner),
            Action::ToggleOnlineStatus,
            Action::AddRefund(refund(100)),
        ];
        for action in &actions {
            assert!(Action::TAGS.contains(&action.kind()));
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json["type"], action.kind());
        }
        assert!(!Action::TAGS.contains(&Action::Unknown.kind()));
    }

    #[test]
    fn test_unknown_tags_decode_to_unknown() {
        let bare = Action::from_json(r#"{"type":"RESET_DEMO"}"#).unwrap();
        assert_eq!(bare, Action::Unknown);

        let with_payload =
            Action::from_json(r#"{"type":"DELETE_SUPPLIER","payload":{"id":3}}"#).unwrap();
        assert_eq!(with_payload, Action::Unknown);
    }

    #[test]
    fn test_known_tag_with_bad_payload_is_an_error() {
        assert!(Action::from_json(r#"{"type":"UPDATE_PRODUCT_STOCK","payload":{"sku":1}}"#).is_err());
        assert!(Action::from_json("not json").is_err());
    }

    #[test]
    fn test_required_permissions() {
        assert!(Action::ToggleOnlineStatus.required_permissions().is_empty());
        assert!(Action::Unknown.required_permissions().is_empty());
        assert_eq!(
            Action::UpdateProductStock(StockUpdate {
                product_id: "SKU001".to_string(),
                new_stock: 1,
            })
            .required_permissions(),
            vec![Permission::InventoryEdit]
        );
    }

    #[test]
    fn test_high_value_refund_needs_approval() {
        assert_eq!(
            Action::AddRefund(refund(5_000)).required_permissions(),
            vec![Permission::PosRefunds]
        );
        assert_eq!(
            Action::AddRefund(refund(5_001)).required_permissions(),
            vec![Permission::PosRefunds, Permission::PosApproveHighValueRefund]
        );
    }
}
