//! Persisted credentials.
//!
//! The browser keeps the access token, refresh token, cached role, cached
//! user id and the per-user read-notification set in `localStorage`. All
//! values are plain strings; the literal strings `"undefined"` and `"null"`
//! are read back as absent.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::warn;

use crate::models::RecordId;

/// Storage key of the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key of the cached role.
pub const USER_ROLE_KEY: &str = "userRole";
/// Storage key of the cached user id.
pub const USER_ID_KEY: &str = "userId";
const READ_NOTIFICATIONS_PREFIX: &str = "readNotifications_";

/// Errors raised when persisting a value.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage in this environment.
    #[error("storage is not available in this environment")]
    Unavailable,
    /// The backing store refused the write.
    #[error("failed to write `{key}`: {reason}")]
    Write {
        /// Key being written.
        key: String,
        /// Message from the backing store.
        reason: String,
    },
    /// A value could not be serialized.
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// Serializer failure.
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value storage backing the credential store.
pub trait KeyValueStore {
    /// Raw stored value, unsanitized.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the backing store refuses the write
    /// (quota, private browsing, missing window).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

/// In-memory store used for tests and non-browser targets.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// No keys held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Treat empty, `"undefined"` and `"null"` values as absent.
#[must_use]
pub fn sanitize(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty() && text != "undefined" && text != "null")
}

/// Typed access to the persisted credentials.
#[derive(Clone)]
pub struct CredentialStore {
    store: Rc<dyn KeyValueStore>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Credential view over `store`.
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Convenience constructor over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStore::new()))
    }

    fn read(&self, key: &str) -> Option<String> {
        sanitize(self.store.get(key))
    }

    fn write_optional(&self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        match value {
            Some(value) => self.store.set(key, value),
            None => {
                self.store.remove(key);
                Ok(())
            }
        }
    }

    /// Stored bearer token, sanitized.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    /// # Errors
    /// Propagates the backing store's write failure.
    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    /// Stored refresh token, sanitized.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Store the refresh token, or remove it when `None`.
    ///
    /// # Errors
    /// Propagates the backing store's write failure.
    pub fn set_refresh_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        self.write_optional(REFRESH_TOKEN_KEY, token)
    }

    /// Cached role. Advisory only: authorization uses the profile's role.
    #[must_use]
    pub fn role(&self) -> Option<String> {
        self.read(USER_ROLE_KEY)
    }

    /// # Errors
    /// Propagates the backing store's write failure.
    pub fn set_role(&self, role: Option<&str>) -> Result<(), StorageError> {
        self.write_optional(USER_ROLE_KEY, role)
    }

    /// Cached user id, sanitized.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.read(USER_ID_KEY)
    }

    /// # Errors
    /// Propagates the backing store's write failure.
    pub fn set_user_id(&self, user_id: &str) -> Result<(), StorageError> {
        self.store.set(USER_ID_KEY, user_id)
    }

    /// Remove the four credential keys. Read sets are left in place.
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_ROLE_KEY, USER_ID_KEY] {
            self.store.remove(key);
        }
    }

    /// Storage key of the read-notification set for `user_id`.
    #[must_use]
    pub fn read_set_key(user_id: &str) -> String {
        format!("{READ_NOTIFICATIONS_PREFIX}{user_id}")
    }

    /// Ids the user has marked read on this device. Unparseable data reads as empty.
    #[must_use]
    pub fn read_notification_ids(&self, user_id: &str) -> BTreeSet<RecordId> {
        let key = Self::read_set_key(user_id);
        let Some(raw) = self.read(&key) else {
            return BTreeSet::new();
        };
        serde_json::from_str::<Vec<RecordId>>(&raw).map_or_else(
            |error| {
                warn!(key = %key, error = %error, "discarding unreadable read-notification set");
                BTreeSet::new()
            },
            |ids| ids.into_iter().collect(),
        )
    }

    /// # Errors
    /// Returns [`StorageError`] if the set cannot be encoded or written.
    pub fn set_read_notification_ids(
        &self,
        user_id: &str,
        ids: &BTreeSet<RecordId>,
    ) -> Result<(), StorageError> {
        let key = Self::read_set_key(user_id);
        let encoded = serde_json::to_string(ids).map_err(|source| StorageError::Encode {
            key: key.clone(),
            source,
        })?;
        self.store.set(&key, &encoded)
    }
}
