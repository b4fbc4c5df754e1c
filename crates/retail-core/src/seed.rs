//! # Demo Dataset
//!
//! The catalog, staff, suppliers and history a fresh demo session starts
//! with.
//!
//! Timestamps are offsets from a caller-supplied `now` so the dataset is
//! deterministic and the core never reads the clock:
//!
//! ```text
//! now - 7d   PO-001 created          now - 3d   ADJ-001 (spoilage)
//! now - 6d   PO-001 ordered          now - 1d   ADJ-002 (theft)
//! now - 2d   PO-002 created          now - 5h   INV-2024-002
//!                                    now - 2h   INV-2024-001
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::money::Money;
use crate::state::AppState;
use crate::types::{
    CartItem, PaymentSplit, Product, PurchaseOrder, PurchaseOrderItem, PurchaseOrderStatus, Role,
    Sale, SaleStatus, StockAdjustment, Supplier, TaxClass, User, UserStatus,
};

impl AppState {
    /// The demo dataset, anchored at `now`. No role selected, online.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        AppState {
            users: users(),
            products: products(),
            suppliers: suppliers(),
            sales: sales(now),
            stock_adjustments: stock_adjustments(now),
            purchase_orders: purchase_orders(now),
            ..AppState::empty()
        }
    }
}

fn users() -> Vec<User> {
    [
        (1, "cashier1", Role::Cashier, UserStatus::Active),
        (2, "manager1", Role::Manager, UserStatus::Active),
        (3, "owner1", Role::Owner, UserStatus::Active),
        (4, "cashier2", Role::Cashier, UserStatus::Inactive),
    ]
    .into_iter()
    .map(|(id, username, role, status)| User {
        id,
        username: username.to_string(),
        role,
        status,
    })
    .collect()
}

fn products() -> Vec<Product> {
    // (sku, barcode, name, category, tax, cost, price, reorder, stock, image seed)
    const CATALOG: &[(&str, &str, &str, &str, TaxClass, i64, i64, i64, i64, u32)] = &[
        ("SKU001", "1234567890123", "Organic Bananas", "Produce", TaxClass::Zero, 50, 99, 50, 120, 101),
        ("SKU002", "2345678901234", "Whole Milk, 1 Gallon", "Dairy", TaxClass::Zero, 250, 399, 30, 45, 102),
        ("SKU003", "3456789012345", "Artisan Sourdough Bread", "Bakery", TaxClass::Standard, 300, 549, 20, 35, 103),
        ("SKU004", "4567890123456", "Premium Ground Coffee", "Pantry", TaxClass::Standard, 800, 1299, 40, 60, 104),
        ("SKU005", "5678901234567", "Wireless Mouse", "Electronics", TaxClass::Standard, 1500, 2999, 10, 25, 105),
        ("SKU006", "6789012345678", "Cotton T-Shirt", "Apparel", TaxClass::Standard, 500, 1499, 50, 200, 106),
    ];

    CATALOG
        .iter()
        .map(
            |&(sku, barcode, name, category, tax_class, cost, price, reorder, stock, image)| Product {
                id: sku.to_string(),
                barcode: barcode.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                tax_class,
                cost_price: Money::from_cents(cost),
                selling_price: Money::from_cents(price),
                reorder_level: reorder,
                stock,
                image_url: Some(format!("https://picsum.photos/seed/{}/400/400", image)),
            },
        )
        .collect()
}

fn suppliers() -> Vec<Supplier> {
    [
        (1, "Fresh Foods Inc.", "John Doe", "123-456-7890", "john@freshfoods.com"),
        (2, "Gadget Masters", "Jane Smith", "098-765-4321", "jane@gadgetmasters.com"),
        (3, "Pantry Provisions Co.", "Peter Jones", "555-555-5555", "peter@pantryco.com"),
    ]
    .into_iter()
    .map(|(id, name, contact, phone, email)| Supplier {
        id,
        name: name.to_string(),
        contact_person: contact.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    })
    .collect()
}

fn line(sku: &str, quantity: i64, unit_cents: i64) -> CartItem {
    CartItem {
        product_id: sku.to_string(),
        quantity,
        unit_price: Money::from_cents(unit_cents),
    }
}

fn sales(now: DateTime<Utc>) -> Vec<Sale> {
    vec![
        Sale {
            invoice_number: "INV-2024-001".to_string(),
            items: vec![line("SKU001", 2, 99), line("SKU003", 1, 549)],
            total: Money::from_cents(747),
            payment: PaymentSplit::cash(Money::from_cents(1000)),
            timestamp: now - Duration::hours(2),
            status: SaleStatus::Completed,
        },
        Sale {
            invoice_number: "INV-2024-002".to_string(),
            items: vec![line("SKU005", 1, 2999)],
            total: Money::from_cents(2999),
            payment: PaymentSplit {
                cash: Money::zero(),
                card: Money::from_cents(2999),
            },
            timestamp: now - Duration::hours(5),
            status: SaleStatus::Completed,
        },
    ]
}

fn stock_adjustments(now: DateTime<Utc>) -> Vec<StockAdjustment> {
    vec![
        StockAdjustment {
            id: "ADJ-001".to_string(),
            product_id: "SKU001".to_string(),
            quantity_change: -5,
            reason: "Spoilage".to_string(),
            timestamp: now - Duration::days(3),
            user_id: 2,
        },
        StockAdjustment {
            id: "ADJ-002".to_string(),
            product_id: "SKU005".to_string(),
            quantity_change: -1,
            reason: "Theft".to_string(),
            timestamp: now - Duration::days(1),
            user_id: 3,
        },
    ]
}

fn po_line(sku: &str, quantity: i64, cost_cents: i64) -> PurchaseOrderItem {
    PurchaseOrderItem {
        product_id: sku.to_string(),
        quantity,
        cost_price: Money::from_cents(cost_cents),
    }
}

fn purchase_orders(now: DateTime<Utc>) -> Vec<PurchaseOrder> {
    vec![
        PurchaseOrder {
            id: "PO-001".to_string(),
            supplier_id: 1,
            items: vec![po_line("SKU001", 100, 50), po_line("SKU002", 50, 250)],
            status: PurchaseOrderStatus::Ordered,
            created_at: now - Duration::days(7),
            ordered_at: Some(now - Duration::days(6)),
        },
        PurchaseOrder {
            id: "PO-002".to_string(),
            supplier_id: 2,
            items: vec![po_line("SKU005", 20, 1500)],
            status: PurchaseOrderStatus::Draft,
            created_at: now - Duration::days(2),
            ordered_at: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_counts() {
        let state = AppState::seeded(Utc::now());
        assert_eq!(state.users.len(), 4);
        assert_eq!(state.products.len(), 6);
        assert_eq!(state.suppliers.len(), 3);
        assert_eq!(state.sales.len(), 2);
        assert_eq!(state.stock_adjustments.len(), 2);
        assert_eq!(state.purchase_orders.len(), 2);
        assert!(state.refunds.is_empty());
        assert!(state.goods_receipt_notes.is_empty());
        assert!(state.role.is_none());
    }

    #[test]
    fn test_seeded_sales_are_consistent() {
        let state = AppState::seeded(Utc::now());
        for sale in &state.sales {
            assert_eq!(Ok(sale.total), sale.computed_total(), "{}", sale.invoice_number);
            assert!(sale.payment.covers(sale.total));
        }
    }

    #[test]
    fn test_seeded_references_resolve() {
        let state = AppState::seeded(Utc::now());
        for po in &state.purchase_orders {
            assert!(state.supplier(po.supplier_id).is_some());
            for item in &po.items {
                assert!(state.product(&item.product_id).is_some());
            }
        }
        for adj in &state.stock_adjustments {
            assert!(state.product(&adj.product_id).is_some());
            assert!(state.user(adj.user_id).is_some());
        }
    }

    #[test]
    fn test_seed_is_deterministic_for_same_anchor() {
        let now = Utc::now();
        assert_eq!(AppState::seeded(now), AppState::seeded(now));
    }
}
