//! # Role Persistence
//!
//! The only state that outlives a session: the role the user last picked,
//! stored as its display name in a one-line file.
//!
//! ```text
//! startup ──► RoleStore::load() ──► Some(Manager) ──► role picker skipped
//!                    │
//!                    └── missing / garbage ──► None ──► role picker shown
//!
//! SET_ROLE ─► RoleStore::save(role)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use retail_core::Role;
use tracing::{debug, warn};

use crate::error::StoreResult;

#[derive(Debug, Clone)]
pub struct RoleStore {
    path: PathBuf,
}

impl RoleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RoleStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted role, if any.
    ///
    /// Never fails: an unreadable or unrecognized value means the user
    /// simply picks a role again.
    pub fn load(&self) -> Option<Role> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "No persisted role");
                return None;
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Could not read persisted role");
                return None;
            }
        };

        match Role::from_str(contents.trim()) {
            Ok(role) => Some(role),
            Err(_) => {
                warn!(path = ?self.path, value = %contents.trim(), "Ignoring unrecognized persisted role");
                None
            }
        }
    }

    pub fn save(&self, role: Role) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, role.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch_store() -> (TempDir, RoleStore) {
        let dir = TempDir::new().unwrap();
        let store = RoleStore::new(dir.path().join("state").join("retail-flow-role"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_means_no_role() {
        let (_dir, store) = scratch_store();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = scratch_store();
        store.save(Role::Manager).unwrap();

        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "Manager");
        assert_eq!(store.load(), Some(Role::Manager));

        store.save(Role::Owner).unwrap();
        assert_eq!(store.load(), Some(Role::Owner));
    }

    #[test]
    fn test_garbage_means_no_role() {
        let (_dir, store) = scratch_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "Janitor").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_tolerates_trailing_newline() {
        let (_dir, store) = scratch_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "Cashier\n").unwrap();

        assert_eq!(store.load(), Some(Role::Cashier));
    }
}
