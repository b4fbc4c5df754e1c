//! # Dispatcher
//!
//! The single writer of the live [`AppState`].
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI ──► dispatch(action)                                                │
//! │              │                                                          │
//! │              ▼                                                          │
//! │         authorize ──── role lacks a permission ──► Err(Unauthorized)    │
//! │              │                                                          │
//! │              ▼                                                          │
//! │   retail_core::apply(&state, &action)                                   │
//! │              │                                                          │
//! │              ├──── Err(CoreError) ───────────────► Err(Core), state kept│
//! │              ▼                                                          │
//! │         state = next ──► SET_ROLE? persist via RoleStore                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Actions are applied one at a time; each one sees the state left by the
//! previous one.

use chrono::{DateTime, Utc};
use retail_core::{
    apply, Action, AppArea, AppState, Cart, Permission, PaymentSplit, PermissionRegistry,
    ReportSummary, Role, Sale,
};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::ids;
use crate::role::RoleStore;

#[derive(Debug)]
pub struct Dispatcher {
    state: AppState,
    registry: PermissionRegistry,
    roles: Option<RoleStore>,
}

impl Dispatcher {
    /// A dispatcher over `state` with the standard permission table and no
    /// role persistence.
    pub fn new(state: AppState) -> Self {
        Dispatcher {
            state,
            registry: PermissionRegistry::standard(),
            roles: None,
        }
    }

    /// Builds the starting state from config and restores the persisted
    /// role.
    pub fn from_config(config: &StoreConfig, now: DateTime<Utc>) -> Self {
        let mut state = if config.seed_demo_data {
            AppState::seeded(now)
        } else {
            AppState::empty()
        };
        state.online = config.start_online;

        let dispatcher = Dispatcher::new(state);
        match config.role_file_path() {
            Some(path) => dispatcher.with_role_store(RoleStore::new(path)),
            None => {
                warn!("No role file location available; role will not persist");
                dispatcher
            }
        }
    }

    /// Attaches role persistence and restores any saved role.
    pub fn with_role_store(mut self, store: RoleStore) -> Self {
        if let Some(role) = store.load() {
            info!(%role, "Restored persisted role");
            self.state.role = Some(role);
        }
        self.roles = Some(store);
        self
    }

    pub fn with_registry(mut self, registry: PermissionRegistry) -> Self {
        self.registry = registry;
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.state.role
    }

    pub fn can_perform(&self, permission: Permission) -> bool {
        self.registry.can_perform(self.state.role, permission)
    }

    /// Navigation guard for the UI.
    pub fn can_access(&self, area: AppArea) -> bool {
        self.can_perform(area.required_permission())
    }

    pub fn accessible_areas(&self) -> Vec<AppArea> {
        AppArea::ALL
            .into_iter()
            .filter(|area| self.can_access(*area))
            .collect()
    }

    /// Report figures as the current role may see them.
    pub fn report(&self) -> ReportSummary {
        ReportSummary::from_state(&self.state, self.can_perform(Permission::ReportsViewCosts))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Fails with the first permission `action` needs that the current
    /// role does not hold.
    pub fn authorize(&self, action: &Action) -> StoreResult<()> {
        match action
            .required_permissions()
            .into_iter()
            .find(|permission| !self.can_perform(*permission))
        {
            Some(permission) => Err(StoreError::Unauthorized {
                action: action.kind(),
                role: self.state.role,
                permission,
            }),
            None => Ok(()),
        }
    }

    pub fn dispatch(&mut self, action: Action) -> StoreResult<&AppState> {
        debug!(action = action.kind(), role = ?self.state.role, "Dispatching");

        if let Err(e) = self.authorize(&action) {
            warn!(action = action.kind(), error = %e, "Action denied");
            return Err(e);
        }

        let next = apply(&self.state, &action).map_err(|e| {
            warn!(action = action.kind(), error = %e, "Action rejected");
            StoreError::Core(e)
        })?;
        self.state = next;

        if let Action::SetRole(role) = action {
            info!(%role, "Role selected");
            self.persist_role(role);
        }

        Ok(&self.state)
    }

    /// Decodes and dispatches a JSON action from the UI.
    pub fn dispatch_json(&mut self, json: &str) -> StoreResult<&AppState> {
        let action = Action::from_json(json)?;
        self.dispatch(action)
    }

    pub fn set_role(&mut self, role: Role) -> StoreResult<&AppState> {
        self.dispatch(Action::SetRole(role))
    }

    /// Rings up `cart` under a fresh invoice number.
    ///
    /// The cart is emptied only if the sale is accepted.
    pub fn checkout(
        &mut self,
        cart: &mut Cart,
        payment: PaymentSplit,
        now: DateTime<Utc>,
    ) -> StoreResult<Sale> {
        let mut draft = cart.clone();
        let sale = draft.checkout(ids::invoice_number(), payment, now, self.state.online)?;

        self.dispatch(Action::AddSale(sale.clone()))?;
        cart.clear();

        info!(invoice = %sale.invoice_number, total = %sale.total, status = %sale.status, "Sale recorded");
        Ok(sale)
    }

    fn persist_role(&self, role: Role) {
        if let Some(store) = &self.roles {
            if let Err(e) = store.save(role) {
                warn!(path = ?store.path(), error = %e, "Could not persist role");
            }
        }
    }
}
