//! # Cart and Parked Sales
//!
//! The checkout screen's transient working copy. Nothing here is part of
//! [`crate::state::AppState`]; a cart only reaches the engine as the
//! [`Sale`] produced by [`Cart::checkout`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tap product ─────► add_product()      ──► +1 unit, price snapshot      │
//! │  Edit quantity ───► update_quantity()  ──► q ≤ 0 removes the line       │
//! │  Pay ─────────────► checkout()         ──► Sale (Completed/Pending Sync)│
//! │  Park ────────────► park()             ──► Sale (Parked) ─► ParkedSales │
//! │  Resume ──────────► ParkedSales::resume() ──► Cart                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding again raises the quantity)
//! - Every line has 1..=999 units, at most 100 lines
//! - A line keeps the price it was added at, even if the product is
//!   repriced while the cart is open

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{items_total, CartItem, PaymentSplit, Product, Sale, SaleStatus};
use crate::validation::{validate_cart_quantity, validate_cart_size};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `product` at its current selling price.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        self.add_quantity(product, 1)
    }

    /// Adds `quantity` units, or raises the quantity of an existing line.
    ///
    /// An existing line keeps its original unit price.
    pub fn add_quantity(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_cart_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if validate_cart_size(self.items.len()).is_err() {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem {
            product_id: product.id.clone(),
            quantity,
            unit_price: product.selling_price,
        });
        Ok(())
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn total(&self) -> CoreResult<Money> {
        items_total(&self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Turns the cart into a sale and empties it.
    ///
    /// The caller supplies the invoice number and timestamp. The status
    /// records connectivity at the time of sale. On error the cart is left
    /// as it was.
    pub fn checkout(
        &mut self,
        invoice_number: impl Into<String>,
        payment: PaymentSplit,
        timestamp: DateTime<Utc>,
        online: bool,
    ) -> CoreResult<Sale> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = self.total()?;
        if !payment.covers(total) {
            return Err(CoreError::InsufficientPayment {
                required: total,
                paid: payment.total_paid(),
            });
        }

        Ok(Sale {
            invoice_number: invoice_number.into(),
            items: std::mem::take(&mut self.items),
            total,
            payment,
            timestamp,
            status: SaleStatus::for_connectivity(online),
        })
    }

    /// Sets the cart aside as a parked sale with nothing paid, and empties it.
    pub fn park(
        &mut self,
        invoice_number: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = self.total()?;
        Ok(Sale {
            invoice_number: invoice_number.into(),
            items: std::mem::take(&mut self.items),
            total,
            payment: PaymentSplit::default(),
            timestamp,
            status: SaleStatus::Parked,
        })
    }
}

/// Parked sales waiting to be resumed, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParkedSales {
    sales: Vec<Sale>,
}

impl ParkedSales {
    pub fn new() -> Self {
        ParkedSales::default()
    }

    /// Parks the cart and returns the parked sale's invoice number.
    pub fn park(
        &mut self,
        cart: &mut Cart,
        invoice_number: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<String> {
        let sale = cart.park(invoice_number, timestamp)?;
        let invoice = sale.invoice_number.clone();
        self.sales.push(sale);
        Ok(invoice)
    }

    /// Removes a parked sale and hands its lines back as a cart.
    pub fn resume(&mut self, invoice_number: &str) -> CoreResult<Cart> {
        let index = self
            .sales
            .iter()
            .position(|s| s.invoice_number == invoice_number)
            .ok_or_else(|| CoreError::ParkedSaleNotFound(invoice_number.to_string()))?;
        let sale = self.sales.remove(index);
        Ok(Cart { items: sale.items })
    }

    pub fn list(&self) -> &[Sale] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxClass;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            barcode: String::new(),
            name: format!("Product {}", id),
            category: "Misc".to_string(),
            tax_class: TaxClass::Standard,
            cost_price: Money::from_cents(price_cents / 2),
            selling_price: Money::from_cents(price_cents),
            reorder_level: 0,
            stock: 100,
            image_url: None,
        }
    }

    /// 2 × $0.99 + 1 × $5.49
    fn scenario_cart() -> Cart {
        let mut cart = Cart::new();
        let bananas = product("SKU001", 99);
        cart.add_product(&bananas).unwrap();
        cart.add_product(&bananas).unwrap();
        cart.add_product(&product("SKU003", 549)).unwrap();
        cart
    }

    #[test]
    fn test_add_product_merges_lines() {
        let cart = scenario_cart();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total().unwrap(), Money::from_cents(747));
    }

    #[test]
    fn test_price_snapshot_survives_repricing() {
        let mut cart = Cart::new();
        let mut coffee = product("SKU004", 1299);
        cart.add_product(&coffee).unwrap();

        coffee.selling_price = Money::from_cents(1499);
        cart.add_product(&coffee).unwrap();

        assert_eq!(cart.items[0].unit_price, Money::from_cents(1299));
        assert_eq!(cart.total().unwrap(), Money::from_cents(2598));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = scenario_cart();
        cart.update_quantity("SKU001", 5).unwrap();
        assert_eq!(cart.total_quantity(), 6);

        cart.update_quantity("SKU001", 0).unwrap();
        assert_eq!(cart.item_count(), 1);

        cart.update_quantity("SKU003", -2).unwrap();
        assert!(cart.is_empty());

        assert_eq!(
            cart.update_quantity("SKU009", 2),
            Err(CoreError::NotInCart("SKU009".to_string()))
        );
    }

    #[test]
    fn test_quantity_limits() {
        let mut cart = scenario_cart();
        assert!(matches!(
            cart.update_quantity("SKU003", MAX_ITEM_QUANTITY + 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));

        cart.update_quantity("SKU003", MAX_ITEM_QUANTITY).unwrap();
        assert!(matches!(
            cart.add_product(&product("SKU003", 549)),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_line_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_product(&product(&format!("P{}", i), 100)).unwrap();
        }
        assert_eq!(
            cart.add_product(&product("ONE-TOO-MANY", 100)),
            Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS
            })
        );
    }

    #[test]
    fn test_checkout_with_change() {
        let mut cart = scenario_cart();
        let sale = cart
            .checkout("INV-3", PaymentSplit::cash(Money::from_cents(1000)), now(), true)
            .unwrap();

        assert_eq!(sale.total, Money::from_cents(747));
        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.change_due(), Money::from_cents(253));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_offline_is_pending_sync() {
        let mut cart = scenario_cart();
        let payment = PaymentSplit {
            cash: Money::from_cents(247),
            card: Money::from_cents(500),
        };
        let sale = cart.checkout("INV-4", payment, now(), false).unwrap();
        assert_eq!(sale.status, SaleStatus::PendingSync);
        assert_eq!(sale.change_due(), Money::zero());
    }

    #[test]
    fn test_checkout_rejections_keep_cart() {
        let mut empty = Cart::new();
        assert_eq!(
            empty.checkout("INV-5", PaymentSplit::default(), now(), true),
            Err(CoreError::EmptyCart)
        );

        let mut cart = scenario_cart();
        let result = cart.checkout("INV-6", PaymentSplit::cash(Money::from_cents(700)), now(), true);
        assert!(matches!(result, Err(CoreError::InsufficientPayment { .. })));
        assert_eq!(cart.total().unwrap(), Money::from_cents(747));
    }

    #[test]
    fn test_checkout_rejects_total_that_does_not_fit() {
        let mut cart = Cart::new();
        cart.add_quantity(&product("SKU009", i64::MAX / 2 + 1), 2).unwrap();

        let payment = PaymentSplit::cash(Money::from_cents(i64::MAX));
        assert!(matches!(
            cart.checkout("INV-7", payment, now(), true),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_park_and_resume() {
        let mut cart = scenario_cart();
        let mut parked = ParkedSales::new();

        let invoice = parked.park(&mut cart, "PARK-1", now()).unwrap();
        assert!(cart.is_empty());
        assert_eq!(parked.len(), 1);
        assert_eq!(parked.list()[0].status, SaleStatus::Parked);
        assert_eq!(parked.list()[0].payment.total_paid(), Money::zero());

        let resumed = parked.resume(&invoice).unwrap();
        assert_eq!(resumed, scenario_cart());
        assert!(parked.is_empty());

        assert_eq!(
            parked.resume("PARK-1"),
            Err(CoreError::ParkedSaleNotFound("PARK-1".to_string()))
        );
    }

    #[test]
    fn test_park_empty_cart_is_rejected() {
        let mut parked = ParkedSales::new();
        assert_eq!(
            parked.park(&mut Cart::new(), "PARK-2", now()),
            Err(CoreError::EmptyCart)
        );
    }
}
