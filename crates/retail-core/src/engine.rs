//! # Domain State Engine
//!
//! `apply(state, action) -> Result<state', CoreError>`: the only way a new
//! [`AppState`] comes into existence.
//!
//! ## Guarantees
//! - **Pure**: no clock, no randomness, no I/O. Same input, same output.
//! - **Total**: every action either yields a state or a typed error;
//!   nothing panics. [`Action::Unknown`] returns the input unchanged.
//! - **Atomic**: the input is borrowed, never modified. A rejected action
//!   leaves no partial effect anywhere.
//!
//! ## Enforced Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales        total == Σ qty × unitPrice, cash + card ≥ total,          │
//! │               ≥ 1 line, every qty > 0, never Parked, stock ≥ qty        │
//! │  Stock        never written below 0                                     │
//! │  Adjustments  nonzero, applied to stock in the same transition          │
//! │  POs          Draft ──► Ordered ──► Received, nothing else              │
//! │  GRNs         exactly one per PO, created with the move to Received,    │
//! │               stock += qty for every PO line in the same transition     │
//! │  Refunds      lines priced as sold, never more than remains unrefunded  │
//! │  References   every productId / supplierId / userId / poId resolves     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Authorization is not checked here; see `retail-store`.

use std::collections::HashMap;

use crate::action::{Action, PurchaseOrderStatusUpdate, StockUpdate};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::state::AppState;
use crate::types::{
    items_total, CartItem, GoodsReceiptNote, Product, PurchaseOrder, PurchaseOrderStatus, Refund,
    Sale, SaleStatus, StockAdjustment, Supplier, User,
};
use crate::validation::{
    validate_non_negative, validate_price, validate_product_name, validate_quantity,
    validate_quantity_change, validate_required, validate_sku,
};

/// Applies one action to a state.
///
/// ```rust
/// use chrono::Utc;
/// use retail_core::{apply, Action, AppState, StockUpdate};
///
/// let state = AppState::seeded(Utc::now());
/// let action = Action::UpdateProductStock(StockUpdate {
///     product_id: "SKU001".to_string(),
///     new_stock: 115,
/// });
///
/// let next = apply(&state, &action).unwrap();
/// assert_eq!(next.product("SKU001").unwrap().stock, 115);
/// assert_eq!(state.product("SKU001").unwrap().stock, 120); // input untouched
/// ```
pub fn apply(state: &AppState, action: &Action) -> CoreResult<AppState> {
    let mut next = state.clone();

    match action {
        Action::SetRole(role) => next.role = Some(*role),
        Action::ToggleOnlineStatus => next.online = !next.online,
        Action::AddSale(sale) => add_sale(&mut next, sale)?,
        Action::UpdateProductStock(update) => update_product_stock(&mut next, update)?,
        Action::AddStockAdjustment(adjustment) => add_stock_adjustment(&mut next, adjustment)?,
        Action::AddUser(user) => add_user(&mut next, user)?,
        Action::AddSupplier(supplier) => add_supplier(&mut next, supplier)?,
        Action::AddProduct(product) => add_product(&mut next, product)?,
        Action::UpdateProduct(product) => update_product(&mut next, product)?,
        Action::AddPurchaseOrder(po) => add_purchase_order(&mut next, po)?,
        Action::UpdatePurchaseOrderStatus(update) => update_po_status(&mut next, update)?,
        Action::AddGrn(grn) => receive_purchase_order(&mut next, grn)?,
        Action::AddRefund(refund) => add_refund(&mut next, refund)?,
        Action::Unknown => {}
    }

    Ok(next)
}

// =============================================================================
// Sales
// =============================================================================

fn add_sale(state: &mut AppState, sale: &Sale) -> CoreResult<()> {
    validate_required("invoiceNumber", &sale.invoice_number)?;
    if state.sale(&sale.invoice_number).is_some() {
        return Err(duplicate("invoiceNumber", &sale.invoice_number));
    }

    if sale.status == SaleStatus::Parked {
        return Err(CoreError::InvalidSaleStatus {
            invoice_number: sale.invoice_number.clone(),
            status: sale.status,
        });
    }

    let demand = line_demand(state, &sale.items)?;

    let computed = items_total(&sale.items)?;
    if computed != sale.total {
        return Err(CoreError::TotalMismatch {
            stated: sale.total,
            computed,
        });
    }

    validate_price("payment.cash", sale.payment.cash)?;
    validate_price("payment.card", sale.payment.card)?;
    if !sale.payment.covers(sale.total) {
        return Err(CoreError::InsufficientPayment {
            required: sale.total,
            paid: sale.payment.total_paid(),
        });
    }

    for (sku, requested) in &demand {
        let available = state.product(sku).map(|p| p.stock).unwrap_or(0);
        if *requested > available {
            return Err(CoreError::InsufficientStock {
                sku: sku.clone(),
                available,
                requested: *requested,
            });
        }
    }

    adjust_stock(state, &demand, -1)?;
    state.sales.push(sale.clone());
    Ok(())
}

/// Checks sale/refund lines and totals the units per SKU.
fn line_demand(state: &AppState, items: &[CartItem]) -> CoreResult<HashMap<String, i64>> {
    if items.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let mut demand: HashMap<String, i64> = HashMap::new();
    for item in items {
        validate_quantity(item.quantity)?;
        validate_price("unitPrice", item.unit_price)?;
        if state.product(&item.product_id).is_none() {
            return Err(CoreError::ProductNotFound(item.product_id.clone()));
        }
        add_units(&mut demand, &item.product_id, item.quantity)?;
    }
    Ok(demand)
}

fn add_units(tally: &mut HashMap<String, i64>, sku: &str, quantity: i64) -> CoreResult<()> {
    let units = tally.entry(sku.to_string()).or_default();
    *units = units
        .checked_add(quantity)
        .ok_or_else(|| CoreError::out_of_range("quantity"))?;
    Ok(())
}

// =============================================================================
// Stock
// =============================================================================

fn update_product_stock(state: &mut AppState, update: &StockUpdate) -> CoreResult<()> {
    let product = state
        .product_mut(&update.product_id)
        .ok_or_else(|| CoreError::ProductNotFound(update.product_id.clone()))?;

    if update.new_stock < 0 {
        return Err(CoreError::NegativeStock {
            sku: update.product_id.clone(),
            resulting: update.new_stock,
        });
    }

    product.stock = update.new_stock;
    Ok(())
}

fn add_stock_adjustment(state: &mut AppState, adjustment: &StockAdjustment) -> CoreResult<()> {
    validate_required("id", &adjustment.id)?;
    if state.stock_adjustments.iter().any(|a| a.id == adjustment.id) {
        return Err(duplicate("id", &adjustment.id));
    }
    validate_quantity_change(adjustment.quantity_change)?;
    validate_required("reason", &adjustment.reason)?;

    if state.user(adjustment.user_id).is_none() {
        return Err(CoreError::UserNotFound(adjustment.user_id));
    }

    let delta = HashMap::from([(adjustment.product_id.clone(), adjustment.quantity_change)]);
    adjust_stock(state, &delta, 1)?;
    state.stock_adjustments.insert(0, adjustment.clone());
    Ok(())
}

/// Applies `sign × delta` to each product's stock, all or nothing.
///
/// A level that would not fit in an i64 is rejected like a negative one.
fn adjust_stock(state: &mut AppState, deltas: &HashMap<String, i64>, sign: i64) -> CoreResult<()> {
    let mut levels = Vec::with_capacity(deltas.len());
    for (sku, delta) in deltas {
        let product = state
            .product(sku)
            .ok_or_else(|| CoreError::ProductNotFound(sku.clone()))?;
        let resulting = delta
            .checked_mul(sign)
            .and_then(|change| product.stock.checked_add(change))
            .ok_or_else(|| CoreError::out_of_range("stock"))?;
        if resulting < 0 {
            return Err(CoreError::NegativeStock {
                sku: sku.clone(),
                resulting,
            });
        }
        levels.push((sku, resulting));
    }

    for (sku, resulting) in levels {
        if let Some(product) = state.product_mut(sku) {
            product.stock = resulting;
        }
    }
    Ok(())
}

// =============================================================================
// Catalog, Staff, Suppliers
// =============================================================================

fn add_user(state: &mut AppState, user: &User) -> CoreResult<()> {
    validate_required("username", &user.username)?;
    if state.user(user.id).is_some() {
        return Err(duplicate("user id", &user.id.to_string()));
    }
    state.users.push(user.clone());
    Ok(())
}

fn add_supplier(state: &mut AppState, supplier: &Supplier) -> CoreResult<()> {
    validate_required("name", &supplier.name)?;
    if state.supplier(supplier.id).is_some() {
        return Err(duplicate("supplier id", &supplier.id.to_string()));
    }
    state.suppliers.push(supplier.clone());
    Ok(())
}

fn validate_product(product: &Product) -> CoreResult<()> {
    validate_sku(&product.id)?;
    validate_product_name(&product.name)?;
    validate_price("costPrice", product.cost_price)?;
    validate_price("sellingPrice", product.selling_price)?;
    validate_non_negative("reorderLevel", product.reorder_level)?;
    validate_non_negative("stock", product.stock)?;
    Ok(())
}

fn add_product(state: &mut AppState, product: &Product) -> CoreResult<()> {
    validate_product(product)?;
    if state.product(&product.id).is_some() {
        return Err(duplicate("sku", &product.id));
    }
    state.products.push(product.clone());
    Ok(())
}

/// Replaces the entry with the same SKU, keeping its position.
fn update_product(state: &mut AppState, product: &Product) -> CoreResult<()> {
    validate_product(product)?;
    let existing = state
        .product_mut(&product.id)
        .ok_or_else(|| CoreError::ProductNotFound(product.id.clone()))?;
    *existing = product.clone();
    Ok(())
}

// =============================================================================
// Procurement
// =============================================================================

fn add_purchase_order(state: &mut AppState, po: &PurchaseOrder) -> CoreResult<()> {
    validate_required("id", &po.id)?;
    if state.purchase_order(&po.id).is_some() {
        return Err(duplicate("purchase order id", &po.id));
    }
    if state.supplier(po.supplier_id).is_none() {
        return Err(CoreError::SupplierNotFound(po.supplier_id));
    }
    if po.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        }
        .into());
    }
    for item in &po.items {
        validate_quantity(item.quantity)?;
        validate_price("costPrice", item.cost_price)?;
        if state.product(&item.product_id).is_none() {
            return Err(CoreError::ProductNotFound(item.product_id.clone()));
        }
    }

    let draft = PurchaseOrder {
        status: PurchaseOrderStatus::Draft,
        ordered_at: None,
        ..po.clone()
    };
    state.purchase_orders.insert(0, draft);
    Ok(())
}

fn update_po_status(state: &mut AppState, update: &PurchaseOrderStatusUpdate) -> CoreResult<()> {
    let po = state
        .purchase_order(&update.id)
        .ok_or_else(|| CoreError::PurchaseOrderNotFound(update.id.clone()))?;

    if !po.status.can_transition_to(update.status) {
        return Err(CoreError::InvalidTransition {
            po_id: update.id.clone(),
            from: po.status,
            to: update.status,
        });
    }

    match update.status {
        PurchaseOrderStatus::Received => {
            let stamp = update
                .receipt
                .as_ref()
                .ok_or_else(|| CoreError::ReceiptRequired(update.id.clone()))?;
            let grn = GoodsReceiptNote {
                id: stamp.grn_id.clone(),
                po_id: po.id.clone(),
                received_items: po.items.clone(),
                received_at: stamp.received_at,
                received_by: stamp.received_by,
            };
            receive_purchase_order(state, &grn)
        }
        status => {
            if let Some(po) = state.purchase_order_mut(&update.id) {
                po.status = status;
                if update.at.is_some() {
                    po.ordered_at = update.at;
                }
            }
            Ok(())
        }
    }
}

/// Records the goods receipt, books the stock in and closes the PO.
fn receive_purchase_order(state: &mut AppState, grn: &GoodsReceiptNote) -> CoreResult<()> {
    validate_required("id", &grn.id)?;
    if state.goods_receipt_notes.iter().any(|g| g.id == grn.id) {
        return Err(duplicate("goods receipt id", &grn.id));
    }

    let po = state
        .purchase_order(&grn.po_id)
        .ok_or_else(|| CoreError::PurchaseOrderNotFound(grn.po_id.clone()))?;

    if state.grn_for(&po.id).is_some() || po.status.is_terminal() {
        return Err(CoreError::AlreadyReceived(po.id.clone()));
    }
    if !po.status.can_transition_to(PurchaseOrderStatus::Received) {
        return Err(CoreError::InvalidTransition {
            po_id: po.id.clone(),
            from: po.status,
            to: PurchaseOrderStatus::Received,
        });
    }
    if grn.received_items != po.items {
        return Err(ValidationError::InvalidFormat {
            field: "receivedItems".to_string(),
            reason: format!("must match the lines of {}", po.id),
        }
        .into());
    }
    if state.user(grn.received_by).is_none() {
        return Err(CoreError::UserNotFound(grn.received_by));
    }

    let mut deltas: HashMap<String, i64> = HashMap::new();
    for item in &grn.received_items {
        add_units(&mut deltas, &item.product_id, item.quantity)?;
    }
    adjust_stock(state, &deltas, 1)?;

    if let Some(po) = state.purchase_order_mut(&grn.po_id) {
        po.status = PurchaseOrderStatus::Received;
    }
    state.goods_receipt_notes.insert(0, grn.clone());
    Ok(())
}

// =============================================================================
// Refunds
// =============================================================================

fn add_refund(state: &mut AppState, refund: &Refund) -> CoreResult<()> {
    validate_required("id", &refund.id)?;
    if state.refunds.iter().any(|r| r.id == refund.id) {
        return Err(duplicate("refund id", &refund.id));
    }

    let sale = state
        .sale(&refund.original_invoice_number)
        .ok_or_else(|| CoreError::SaleNotFound(refund.original_invoice_number.clone()))?;

    let returned = line_demand(state, &refund.items)?;
    for (sku, requested) in &returned {
        let sold = sale.quantity_of(sku);
        if sold == 0 {
            return Err(CoreError::NotOnInvoice {
                invoice_number: sale.invoice_number.clone(),
                sku: sku.clone(),
            });
        }
        let refundable = sold - state.refunded_quantity(&sale.invoice_number, sku);
        if *requested > refundable {
            return Err(CoreError::RefundExceedsSale {
                sku: sku.clone(),
                refundable,
                requested: *requested,
            });
        }
    }

    for item in &refund.items {
        let sold_at_price = sale
            .items
            .iter()
            .any(|line| line.product_id == item.product_id && line.unit_price == item.unit_price);
        if !sold_at_price {
            return Err(CoreError::RefundPriceMismatch {
                invoice_number: sale.invoice_number.clone(),
                sku: item.product_id.clone(),
                unit_price: item.unit_price,
            });
        }
    }

    let computed = items_total(&refund.items)?;
    if computed != refund.total {
        return Err(CoreError::TotalMismatch {
            stated: refund.total,
            computed,
        });
    }
    if state.user(refund.processed_by).is_none() {
        return Err(CoreError::UserNotFound(refund.processed_by));
    }

    adjust_stock(state, &returned, 1)?;
    state.refunds.push(refund.clone());
    Ok(())
}

fn duplicate(field: &str, value: &str) -> CoreError {
    ValidationError::Duplicate {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================
