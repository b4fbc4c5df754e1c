//! # Application State
//!
//! The canonical in-memory representation of everything the engine owns.
//!
//! ```text
//! ┌────────────────────────────── AppState ───────────────────────────────┐
//! │  role: Option<Role>      online: bool                                 │
//! │                                                                       │
//! │  users ─────────────── append          suppliers ────────── append    │
//! │  products ──────────── append / replace in place / stock writes       │
//! │  sales ─────────────── append (oldest first)                          │
//! │  refunds ───────────── append (oldest first)                          │
//! │  purchase_orders ───── prepend (newest first), status transitions     │
//! │  goods_receipt_notes ─ prepend (newest first)                         │
//! │  stock_adjustments ─── prepend (newest first)                         │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only [`crate::engine::apply`] produces new states. Lookups return
//! `Option`; a miss is never an error at this level. The `*_label`
//! helpers render the "Unknown …" text the UI shows for dangling ids.

use serde::{Deserialize, Serialize};

use crate::types::{
    GoodsReceiptNote, Product, PurchaseOrder, Refund, Role, Sale, StockAdjustment, Supplier, User,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Self-selected demo role; `None` until the user picks one.
    pub role: Option<Role>,
    /// Connectivity flag. Only labels new sales.
    pub online: bool,
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub refunds: Vec<Refund>,
    pub suppliers: Vec<Supplier>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub goods_receipt_notes: Vec<GoodsReceiptNote>,
    pub stock_adjustments: Vec<StockAdjustment>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::empty()
    }
}

impl AppState {
    /// No data, no role, online.
    pub fn empty() -> Self {
        AppState {
            role: None,
            online: true,
            users: Vec::new(),
            products: Vec::new(),
            sales: Vec::new(),
            refunds: Vec::new(),
            suppliers: Vec::new(),
            purchase_orders: Vec::new(),
            goods_receipt_notes: Vec::new(),
            stock_adjustments: Vec::new(),
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn product(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == sku)
    }

    pub(crate) fn product_mut(&mut self, sku: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == sku)
    }

    pub fn supplier(&self, id: u32) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn user(&self, id: u32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn sale(&self, invoice_number: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.invoice_number == invoice_number)
    }

    pub fn purchase_order(&self, id: &str) -> Option<&PurchaseOrder> {
        self.purchase_orders.iter().find(|po| po.id == id)
    }

    pub(crate) fn purchase_order_mut(&mut self, id: &str) -> Option<&mut PurchaseOrder> {
        self.purchase_orders.iter_mut().find(|po| po.id == id)
    }

    /// The goods receipt recorded for a PO, if it has been received.
    pub fn grn_for(&self, po_id: &str) -> Option<&GoodsReceiptNote> {
        self.goods_receipt_notes.iter().find(|grn| grn.po_id == po_id)
    }

    /// Units of `sku` already refunded against `invoice_number`.
    pub fn refunded_quantity(&self, invoice_number: &str, sku: &str) -> i64 {
        self.refunds
            .iter()
            .filter(|r| r.original_invoice_number == invoice_number)
            .flat_map(|r| r.items.iter())
            .filter(|i| i.product_id == sku)
            .map(|i| i.quantity)
            .sum()
    }

    // =========================================================================
    // Display Helpers
    // =========================================================================

    pub fn product_label(&self, sku: &str) -> String {
        self.product(sku)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Unknown Product".to_string())
    }

    pub fn supplier_label(&self, id: u32) -> String {
        self.supplier(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown Supplier".to_string())
    }

    pub fn user_label(&self, id: u32) -> String {
        self.user(id)
            .map(|u| u.username.clone())
            .unwrap_or_else(|| "Unknown User".to_string())
    }

    /// Products at or below their reorder level, in catalog order.
    pub fn low_stock_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.needs_reorder()).collect()
    }
}
