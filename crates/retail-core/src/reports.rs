//! # Reports
//!
//! Headline figures for the reports screen, computed from the sales log.
//!
//! ```text
//! total_sales    = Σ sale.total
//! estimated_tax  = 5% of total_sales (demo figure, not per tax class)
//! total_cost     = Σ line.quantity × product.cost_price   (costs visible only)
//! total_profit   = total_sales − total_cost               (costs visible only)
//! ```
//!
//! Cost uses the product's *current* cost price; a line whose product no
//! longer resolves counts as zero cost.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::permissions::{can_perform, Permission};
use crate::state::AppState;
use crate::types::{Role, TaxRate};

/// Flat rate behind `estimated_tax`.
pub const ESTIMATED_TAX_RATE: TaxRate = TaxRate::from_bps(500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub sale_count: usize,
    pub total_sales: Money,
    pub estimated_tax: Money,
    /// `None` unless the viewer may see costs.
    pub total_cost: Option<Money>,
    pub total_profit: Option<Money>,
}

impl ReportSummary {
    pub fn from_state(state: &AppState, can_view_costs: bool) -> Self {
        let total_sales: Money = state.sales.iter().map(|s| s.total).sum();

        let total_cost = can_view_costs.then(|| {
            state
                .sales
                .iter()
                .flat_map(|s| s.items.iter())
                .map(|item| {
                    state
                        .product(&item.product_id)
                        .map(|p| p.cost_price.multiply_quantity(item.quantity))
                        .unwrap_or_default()
                })
                .sum::<Money>()
        });

        ReportSummary {
            sale_count: state.sales.len(),
            total_sales,
            estimated_tax: total_sales.calculate_tax(ESTIMATED_TAX_RATE),
            total_cost,
            total_profit: total_cost.map(|cost| total_sales.saturating_sub(cost)),
        }
    }

    /// Summary as `role` is allowed to see it.
    pub fn for_role(state: &AppState, role: Option<Role>) -> Self {
        Self::from_state(state, can_perform(role, Permission::ReportsViewCosts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn seeded() -> AppState {
        AppState::seeded(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_seeded_summary_with_costs() {
        // $7.47 + $29.99; cost 2×0.50 + 3.00 + 15.00
        let summary = ReportSummary::from_state(&seeded(), true);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.total_sales, Money::from_cents(3746));
        assert_eq!(summary.estimated_tax, Money::from_cents(187));
        assert_eq!(summary.total_cost, Some(Money::from_cents(1900)));
        assert_eq!(summary.total_profit, Some(Money::from_cents(1846)));
    }

    #[test]
    fn test_costs_hidden_without_permission() {
        let summary = ReportSummary::for_role(&seeded(), Some(Role::Cashier));
        assert_eq!(summary.total_sales, Money::from_cents(3746));
        assert!(summary.total_cost.is_none());
        assert!(summary.total_profit.is_none());

        let manager = ReportSummary::for_role(&seeded(), Some(Role::Manager));
        assert!(manager.total_cost.is_some());

        assert!(ReportSummary::for_role(&seeded(), None).total_cost.is_none());
    }

    #[test]
    fn test_unresolved_product_costs_nothing() {
        let mut state = seeded();
        state.products.retain(|p| p.id != "SKU005");

        let summary = ReportSummary::from_state(&state, true);
        assert_eq!(summary.total_cost, Some(Money::from_cents(400)));
    }

    #[test]
    fn test_empty_state() {
        let summary = ReportSummary::from_state(&AppState::empty(), true);
        assert_eq!(summary.sale_count, 0);
        assert_eq!(summary.total_sales, Money::zero());
        assert_eq!(summary.total_profit, Some(Money::zero()));
    }
}
