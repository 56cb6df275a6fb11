//! Session
//!
//! The signed-in shopper, held as an explicit object rather than looked up
//! ambiently. A session is restored from the store at start-up, replaced on
//! sign-in and removed from the store on sign-out.

use std::sync::Arc;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::storage::{BlobStore, StorageError, StoreKey};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper
    Customer,

    /// Store administrator
    Admin,

    /// Role this build does not know about
    #[serde(other)]
    Other,
}

/// The signed-in user as stored under the `session-user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Account id issued by the auth service
    pub id: String,

    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Phone number, if given at sign-up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Granted roles
    #[serde(default)]
    pub roles: SmallVec<[Role; 2]>,

    /// When the session began
    pub signed_in_at: Timestamp,
}

impl SessionUser {
    /// Whether the user holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The current session, anonymous or signed in.
#[derive(Debug, Clone)]
pub struct Session {
    user: Option<SessionUser>,
    store: Arc<dyn BlobStore>,
}

impl Session {
    /// A session with nobody signed in. Nothing is written to the store.
    pub fn anonymous(store: Arc<dyn BlobStore>) -> Self {
        Self { user: None, store }
    }

    /// Restore the session saved in `store`. Missing or unreadable data yields
    /// an anonymous session.
    pub fn restore(store: Arc<dyn BlobStore>) -> Self {
        let key = StoreKey::SessionUser;

        let user = match store.get(key.as_str()) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(error) => {
                    warn!(%key, %error, "discarding unparsable session");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(%key, %error, "failed to read session; starting anonymous");
                None
            }
        };

        Self { user, store }
    }

    /// Replace the session with `user` and persist it.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the session could not be written. The
    /// in-memory session is replaced regardless.
    pub fn establish(&mut self, user: SessionUser) -> Result<(), StorageError> {
        info!(user = %user.id, "session established");

        let serialized = serde_json::to_string(&user);
        self.user = Some(user);

        self.store.set(StoreKey::SessionUser.as_str(), &serialized?)
    }

    /// End the session and remove it from the store.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the stored session could not be removed.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "signed out");
        }

        self.store.remove(StoreKey::SessionUser.as_str())
    }

    /// The signed-in user.
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Whether anyone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the signed-in user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.has_role(Role::Admin))
    }
}
