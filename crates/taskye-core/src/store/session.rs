// ── Session store ──
//
// Holds at most one authenticated user. The user directory lives in its own
// snapshot and is seeded with the demo accounts on first use.

use std::sync::Arc;

use tracing::{info, warn};

use super::snapshot::{SnapshotPort, keys};
use crate::error::CoreError;
use crate::model::{User, UserRecord, demo_users};

pub struct SessionStore {
    port: Arc<dyn SnapshotPort>,
    current: Option<User>,
}

impl SessionStore {
    /// Seed the user directory if absent and restore any saved session.
    /// A corrupt session snapshot is logged and cleared.
    pub fn open(port: Arc<dyn SnapshotPort>) -> Result<Self, CoreError> {
        if port.load(keys::USERS)?.is_none() {
            let raw = serde_json::to_string_pretty(&demo_users())
                .map_err(|e| CoreError::storage(keys::USERS, e))?;
            port.save(keys::USERS, &raw)?;
        }

        let mut store = Self {
            port,
            current: None,
        };

        match store.port.load(keys::SESSION) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => store.current = Some(user),
                Err(e) => {
                    warn!(error = %e, "corrupt session snapshot, logging out");
                    store.logout()?;
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "session snapshot unreadable, logging out");
                store.logout()?;
            }
        }

        Ok(store)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User, CoreError> {
        let user = self
            .directory()
            .into_iter()
            .find(|r| r.matches(email, password))
            .map(|r| r.user)
            .ok_or(CoreError::InvalidCredentials)?;

        let raw =
            serde_json::to_string(&user).map_err(|e| CoreError::storage(keys::SESSION, e))?;
        self.port.save(keys::SESSION, &raw)?;
        self.current = Some(user.clone());

        info!(email = %user.email, "logged in");
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.port.remove(keys::SESSION)?;
        self.current = None;
        Ok(())
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The saved directory, or the demo accounts if it cannot be read.
    fn directory(&self) -> Vec<UserRecord> {
        match self.port.load(keys::USERS) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "corrupt user directory, using demo accounts");
                demo_users()
            }),
            _ => demo_users(),
        }
    }
}
