//! Authentication state, its persistence and the backend seams it relies on.

pub mod backend;
pub mod manager;
pub mod store;

pub use backend::{AuthBackend, NotificationBackend, RootAdminBackend};
pub use manager::{AuthCheck, AuthRecovery, LoginOutcome, Session, SessionError, SessionManager};
pub use store::{CredentialStore, KeyValueStore, MemoryStore, StorageError};
