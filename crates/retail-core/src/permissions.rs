//! # Permissions
//!
//! Role-based access control: a static table from [`Role`] to the set of
//! [`Permission`] keys that role holds.
//!
//! ## Entitlements
//! ```text
//! ┌──────────────────────────────────┬─────────┬─────────┬─────────┐
//! │ Permission                       │ Cashier │ Manager │  Owner  │
//! ├──────────────────────────────────┼─────────┼─────────┼─────────┤
//! │ pos.create                       │    ✓    │    ✓    │    ✓    │
//! │ pos.refunds                      │    ✓    │    ✓    │    ✓    │
//! │ pos.approve_high_value_refund    │         │    ✓    │    ✓    │
//! │ inventory.view                   │    ✓    │    ✓    │    ✓    │
//! │ inventory.edit                   │         │         │    ✓    │
//! │ procurement.manage               │         │    ✓    │    ✓    │
//! │ reports.view_financials          │         │    ✓    │    ✓    │
//! │ reports.view_costs               │         │    ✓    │    ✓    │
//! │ stock_adjustment.create          │         │    ✓    │    ✓    │
//! │ admin.manage_users               │         │         │    ✓    │
//! │ admin.manage_suppliers           │         │         │    ✓    │
//! │ sales.view                       │         │    ✓    │    ✓    │
//! └──────────────────────────────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! Each column is its own list. The columns happen to nest today, but no
//! code derives one role's set from another's.
//!
//! Missing entries deny: no role, a role absent from the table, and an
//! unrecognized key all answer `false`.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Role;

// =============================================================================
// Permission Keys
// =============================================================================

/// A protected capability.
///
/// Closed set. A new capability means a new variant here plus an entry in
/// each role's list below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Permission {
    #[serde(rename = "pos.create")]
    PosCreate,
    #[serde(rename = "pos.refunds")]
    PosRefunds,
    #[serde(rename = "pos.approve_high_value_refund")]
    PosApproveHighValueRefund,
    #[serde(rename = "inventory.view")]
    InventoryView,
    #[serde(rename = "inventory.edit")]
    InventoryEdit,
    #[serde(rename = "procurement.manage")]
    ProcurementManage,
    #[serde(rename = "reports.view_financials")]
    ReportsViewFinancials,
    #[serde(rename = "reports.view_costs")]
    ReportsViewCosts,
    #[serde(rename = "stock_adjustment.create")]
    StockAdjustmentCreate,
    #[serde(rename = "admin.manage_users")]
    AdminManageUsers,
    #[serde(rename = "admin.manage_suppliers")]
    AdminManageSuppliers,
    #[serde(rename = "sales.view")]
    SalesView,
}

impl Permission {
    pub const ALL: [Permission; 12] = [
        Permission::PosCreate,
        Permission::PosRefunds,
        Permission::PosApproveHighValueRefund,
        Permission::InventoryView,
        Permission::InventoryEdit,
        Permission::ProcurementManage,
        Permission::ReportsViewFinancials,
        Permission::ReportsViewCosts,
        Permission::StockAdjustmentCreate,
        Permission::AdminManageUsers,
        Permission::AdminManageSuppliers,
        Permission::SalesView,
    ];

    /// The dotted key, e.g. `"inventory.edit"`.
    pub const fn key(&self) -> &'static str {
        match self {
            Permission::PosCreate => "pos.create",
            Permission::PosRefunds => "pos.refunds",
            Permission::PosApproveHighValueRefund => "pos.approve_high_value_refund",
            Permission::InventoryView => "inventory.view",
            Permission::InventoryEdit => "inventory.edit",
            Permission::ProcurementManage => "procurement.manage",
            Permission::ReportsViewFinancials => "reports.view_financials",
            Permission::ReportsViewCosts => "reports.view_costs",
            Permission::StockAdjustmentCreate => "stock_adjustment.create",
            Permission::AdminManageUsers => "admin.manage_users",
            Permission::AdminManageSuppliers => "admin.manage_suppliers",
            Permission::SalesView => "sales.view",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Permission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.key() == s)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "permission".to_string(),
                reason: format!("unknown permission key '{}'", s),
            })
    }
}

// =============================================================================
// Default Table
// =============================================================================

pub const CASHIER_PERMISSIONS: &[Permission] = &[
    Permission::PosCreate,
    Permission::PosRefunds,
    Permission::InventoryView,
];

pub const MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::PosCreate,
    Permission::PosRefunds,
    Permission::PosApproveHighValueRefund,
    Permission::InventoryView,
    Permission::ProcurementManage,
    Permission::ReportsViewFinancials,
    Permission::ReportsViewCosts,
    Permission::StockAdjustmentCreate,
    Permission::SalesView,
];

pub const OWNER_PERMISSIONS: &[Permission] = &[
    Permission::PosCreate,
    Permission::PosRefunds,
    Permission::PosApproveHighValueRefund,
    Permission::InventoryView,
    Permission::InventoryEdit,
    Permission::ProcurementManage,
    Permission::ReportsViewFinancials,
    Permission::ReportsViewCosts,
    Permission::StockAdjustmentCreate,
    Permission::AdminManageUsers,
    Permission::AdminManageSuppliers,
    Permission::SalesView,
];

impl Role {
    /// The role's entitlement list in the default table.
    pub const fn entitlements(&self) -> &'static [Permission] {
        match self {
            Role::Cashier => CASHIER_PERMISSIONS,
            Role::Manager => MANAGER_PERMISSIONS,
            Role::Owner => OWNER_PERMISSIONS,
        }
    }
}

/// Checks the default table.
///
/// ```rust
/// use retail_core::{can_perform, Permission, Role};
///
/// assert!(can_perform(Some(Role::Owner), Permission::AdminManageUsers));
/// assert!(!can_perform(Some(Role::Cashier), Permission::InventoryEdit));
/// assert!(!can_perform(None, Permission::PosCreate));
/// ```
pub fn can_perform(role: Option<Role>, permission: Permission) -> bool {
    role.is_some_and(|r| r.entitlements().contains(&permission))
}

/// String-keyed variant of [`can_perform`]; unrecognized keys deny.
pub fn can_perform_key(role: Option<Role>, key: &str) -> bool {
    key.parse::<Permission>()
        .is_ok_and(|permission| can_perform(role, permission))
}

// =============================================================================
// Registry
// =============================================================================

/// An explicit role → permissions table.
///
/// [`PermissionRegistry::standard`] mirrors the default table; other
/// tables (say, a trial setup where some role is not yet defined) can be
/// built with [`PermissionRegistry::empty`] and [`PermissionRegistry::grant`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionRegistry {
    table: HashMap<Role, HashSet<Permission>>,
}

impl PermissionRegistry {
    /// A table with no roles; every check denies.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for role in Role::ALL {
            registry.grant(role, role.entitlements().iter().copied());
        }
        registry
    }

    /// Adds permissions to a role, creating the role entry if needed.
    pub fn grant(&mut self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> &mut Self {
        self.table.entry(role).or_default().extend(permissions);
        self
    }

    pub fn can_perform(&self, role: Option<Role>, permission: Permission) -> bool {
        role.and_then(|r| self.table.get(&r))
            .is_some_and(|set| set.contains(&permission))
    }

    pub fn can_perform_key(&self, role: Option<Role>, key: &str) -> bool {
        key.parse::<Permission>()
            .is_ok_and(|permission| self.can_perform(role, permission))
    }

    /// Permissions held by `role`, sorted. Empty for unknown roles.
    pub fn permissions_for(&self, role: Role) -> Vec<Permission> {
        let mut permissions: Vec<Permission> = self
            .table
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        permissions.sort();
        permissions
    }
}

// =============================================================================
// Application Areas
// =============================================================================

/// A protected area of the application and the permission guarding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AppArea {
    Pos,
    Sales,
    Refunds,
    Inventory,
    Procurement,
    StockAdjustment,
    Reports,
    Admin,
}

impl AppArea {
    /// Menu order.
    pub const ALL: [AppArea; 8] = [
        AppArea::Pos,
        AppArea::Sales,
        AppArea::Refunds,
        AppArea::Inventory,
        AppArea::Procurement,
        AppArea::StockAdjustment,
        AppArea::Reports,
        AppArea::Admin,
    ];

    pub const fn required_permission(&self) -> Permission {
        match self {
            AppArea::Pos => Permission::PosCreate,
            AppArea::Sales => Permission::SalesView,
            AppArea::Refunds => Permission::PosRefunds,
            AppArea::Inventory => Permission::InventoryView,
            AppArea::Procurement => Permission::ProcurementManage,
            AppArea::StockAdjustment => Permission::StockAdjustmentCreate,
            AppArea::Reports => Permission::ReportsViewFinancials,
            AppArea::Admin => Permission::AdminManageUsers,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            AppArea::Pos => "POS",
            AppArea::Sales => "Sales",
            AppArea::Refunds => "Refunds",
            AppArea::Inventory => "Inventory",
            AppArea::Procurement => "Procurement",
            AppArea::StockAdjustment => "Stock Adjust",
            AppArea::Reports => "Reports",
            AppArea::Admin => "Admin",
        }
    }
}

/// Areas `role` may open, in menu order.
pub fn accessible_areas(role: Option<Role>) -> Vec<AppArea> {
    AppArea::ALL
        .into_iter()
        .filter(|area| can_perform(role, area.required_permission()))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_keys_are_granted_and_others_denied() {
        for role in Role::ALL {
            for permission in Permission::ALL {
                let listed = role.entitlements().contains(&permission);
                assert_eq!(
                    can_perform(Some(role), permission),
                    listed,
                    "{role} / {permission}"
                );
            }
        }
    }

    #[test]
    fn test_no_role_denies_everything() {
        for permission in Permission::ALL {
            assert!(!can_perform(None, permission));
            assert!(!can_perform_key(None, permission.key()));
        }
    }

    #[test]
    fn test_unknown_key_denies() {
        assert!(!can_perform_key(Some(Role::Owner), "admin.delete_everything"));
        assert!(!can_perform_key(Some(Role::Owner), ""));
        assert!(can_perform_key(Some(Role::Owner), "inventory.edit"));
    }

    #[test]
    fn test_key_round_trips_through_str_and_json() {
        for permission in Permission::ALL {
            assert_eq!(permission.key().parse::<Permission>().unwrap(), permission);
            let json = serde_json::to_string(&permission).unwrap();
            assert_eq!(json, format!("\"{}\"", permission.key()));
        }
    }

    #[test]
    fn test_specific_entitlements() {
        assert!(can_perform(Some(Role::Cashier), Permission::PosRefunds));
        assert!(!can_perform(Some(Role::Cashier), Permission::PosApproveHighValueRefund));
        assert!(!can_perform(Some(Role::Manager), Permission::InventoryEdit));
        assert!(!can_perform(Some(Role::Manager), Permission::AdminManageSuppliers));
        assert!(can_perform(Some(Role::Manager), Permission::ReportsViewCosts));
        assert_eq!(OWNER_PERMISSIONS.len(), Permission::ALL.len());
    }

    #[test]
    fn test_registry_standard_matches_default_table() {
        let registry = PermissionRegistry::standard();
        for role in Role::ALL {
            for permission in Permission::ALL {
                assert_eq!(
                    registry.can_perform(Some(role), permission),
                    can_perform(Some(role), permission)
                );
            }
        }
    }

    #[test]
    fn test_registry_missing_role_denies() {
        let mut registry = PermissionRegistry::empty();
        registry.grant(Role::Cashier, [Permission::PosCreate]);

        assert!(registry.can_perform(Some(Role::Cashier), Permission::PosCreate));
        assert!(!registry.can_perform(Some(Role::Owner), Permission::PosCreate));
        assert!(registry.permissions_for(Role::Owner).is_empty());
        assert!(!registry.can_perform(None, Permission::PosCreate));
    }

    #[test]
    fn test_registry_roles_are_independent() {
        // A junior role that is not a subset of Cashier.
        let mut registry = PermissionRegistry::empty();
        registry
            .grant(Role::Cashier, [Permission::PosCreate])
            .grant(Role::Manager, [Permission::SalesView]);

        assert!(!registry.can_perform(Some(Role::Manager), Permission::PosCreate));
        assert_eq!(registry.permissions_for(Role::Manager), vec![Permission::SalesView]);
    }

    #[test]
    fn test_accessible_areas() {
        assert_eq!(
            accessible_areas(Some(Role::Cashier)),
            vec![AppArea::Pos, AppArea::Refunds, AppArea::Inventory]
        );
        assert!(!accessible_areas(Some(Role::Manager)).contains(&AppArea::Admin));
        assert_eq!(accessible_areas(Some(Role::Owner)).len(), AppArea::ALL.len());
        assert!(accessible_areas(None).is_empty());
    }
}
