pub mod board;
pub mod dao;
pub mod identity;
pub mod notify;
pub mod state;
pub mod store;
pub mod sync;

pub use dao::*;
pub use identity::{Identity, StaticIdentity};
pub use notify::{LogNotifier, Notification, Notifier};
pub use state::Services;
pub use store::{DocumentStore, MemoryStore, MongoStore};
pub use sync::{BoardMutation, BoardSession, Continuation, OpenBoard, SyncCoordinator, SyncError, SyncState};
