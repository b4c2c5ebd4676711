//! Session layer: persisted identity, the session store and the dashboard
//! watcher that follows it.

pub mod dashboard;
pub mod error;
pub mod storage;
pub mod store;

pub use dashboard::{DashboardView, DashboardWatcher, load_dashboard};
pub use error::{SessionError, SessionResult};
pub use storage::IdentityStorage;
pub use store::SessionStore;
