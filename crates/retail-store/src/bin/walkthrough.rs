//! Scripted demo session. A cashier parks a sale, resumes it and rings it
//! up. A manager corrects stock and receives a purchase order. The owner
//! reads the reports.
//!
//! ```text
//! cargo run -p retail-store --bin walkthrough
//! RETAIL_START_OFFLINE=1 RUST_LOG=debug cargo run -p retail-store --bin walkthrough
//! ```

use chrono::Utc;
use retail_core::{
    Action, Cart, Money, ParkedSales, PaymentSplit, PurchaseOrderStatus, PurchaseOrderStatusUpdate,
    ReceiptStamp, Role, StockAdjustment,
};
use retail_store::{ids, init_tracing, Dispatcher, StoreConfig, StoreResult};
use tracing::{info, warn};

fn main() -> StoreResult<()> {
    init_tracing();

    let config = StoreConfig::load_or_default(None);
    let mut store = Dispatcher::from_config(&config, Utc::now());
    info!(
        products = store.state().products.len(),
        online = store.state().online,
        role = ?store.role(),
        "Store ready"
    );

    ring_up_sale(&mut store)?;
    adjust_and_receive(&mut store)?;
    read_reports(&mut store)?;

    Ok(())
}

fn ring_up_sale(store: &mut Dispatcher) -> StoreResult<()> {
    store.set_role(Role::Cashier)?;

    let mut cart = Cart::new();
    for sku in ["SKU001", "SKU001", "SKU003"] {
        if let Some(product) = store.state().product(sku).cloned() {
            cart.add_product(&product)?;
        }
    }

    // Customer steps away to fetch a wallet; the lane serves the next one.
    let mut parked = ParkedSales::new();
    let ticket = parked.park(&mut cart, ids::parked_invoice_number(), Utc::now())?;
    info!(%ticket, waiting = parked.len(), "Sale parked");

    let mut cart = parked.resume(&ticket)?;
    let sale = store.checkout(&mut cart, PaymentSplit::cash(Money::from_cents(1000)), Utc::now())?;
    info!(
        invoice = %sale.invoice_number,
        change = %sale.change_due(),
        "Change handed back"
    );

    // Cashiers cannot touch procurement.
    if let Err(e) = store.dispatch(Action::UpdatePurchaseOrderStatus(PurchaseOrderStatusUpdate {
        id: "PO-002".to_string(),
        status: PurchaseOrderStatus::Ordered,
        at: Some(Utc::now()),
        receipt: None,
    })) {
        warn!(error = %e, "As expected");
    }
    Ok(())
}

fn adjust_and_receive(store: &mut Dispatcher) -> StoreResult<()> {
    store.set_role(Role::Manager)?;
    let manager_id = store
        .state()
        .users
        .iter()
        .find(|u| u.role == Role::Manager && u.is_active())
        .map(|u| u.id)
        .unwrap_or(2);

    store.dispatch(Action::AddStockAdjustment(StockAdjustment {
        id: ids::adjustment_id(),
        product_id: "SKU001".to_string(),
        quantity_change: -5,
        reason: "Spoilage".to_string(),
        timestamp: Utc::now(),
        user_id: manager_id,
    }))?;

    let receipt = ReceiptStamp {
        grn_id: ids::grn_id(),
        received_at: Utc::now(),
        received_by: manager_id,
    };
    store.dispatch(Action::UpdatePurchaseOrderStatus(PurchaseOrderStatusUpdate {
        id: "PO-001".to_string(),
        status: PurchaseOrderStatus::Received,
        at: None,
        receipt: Some(receipt),
    }))?;

    for product in store.state().products.iter().take(2) {
        info!(sku = %product.id, stock = product.stock, "After receiving PO-001");
    }
    Ok(())
}

fn read_reports(store: &mut Dispatcher) -> StoreResult<()> {
    for role in [Role::Cashier, Role::Owner] {
        store.set_role(role)?;
        let report = store.report();
        info!(
            %role,
            sales = %report.total_sales,
            tax = %report.estimated_tax,
            profit = ?report.total_profit.map(|p| p.to_string()),
            "Report"
        );
    }

    for product in store.state().low_stock_products() {
        warn!(sku = %product.id, stock = product.stock, reorder = product.reorder_level, "Needs reorder");
    }
    Ok(())
}
