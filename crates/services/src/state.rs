use std::sync::Arc;

use taskboard_config::{Settings, StoreBackend};
use taskboard_db::indexes::ensure_indexes;
use tracing::info;

use crate::dao::{BoardDao, UserDao};
use crate::identity::Identity;
use crate::notify::Notifier;
use crate::store::{DocumentStore, MemoryStore, MongoStore};
use crate::sync::SyncCoordinator;

/// Everything a client needs, wired to one store.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn Identity>,
    pub boards: Arc<BoardDao>,
    pub users: Arc<UserDao>,
    pub sync: Arc<SyncCoordinator>,
}

impl Services {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn Identity>,
        notifier: Arc<dyn Notifier>,
        settings: &Settings,
    ) -> Self {
        let boards = Arc::new(BoardDao::new(Arc::clone(&store), Arc::clone(&identity)));
        let users = Arc::new(UserDao::new(Arc::clone(&store), Arc::clone(&identity)));
        let sync = Arc::new(SyncCoordinator::new(
            Arc::clone(&boards),
            Arc::clone(&users),
            notifier,
            &settings.sync,
        ));

        Self {
            store,
            identity,
            boards,
            users,
            sync,
        }
    }

    /// Builds the store selected in `settings`, connecting to MongoDB if needed.
    pub async fn connect(
        identity: Arc<dyn Identity>,
        notifier: Arc<dyn Notifier>,
        settings: &Settings,
    ) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match settings.database.backend {
            StoreBackend::Mongo => {
                let db = taskboard_db::connect(&settings.database).await?;
                ensure_indexes(&db).await?;
                Arc::new(MongoStore::new(db))
            }
            StoreBackend::Memory => {
                info!("Using in-memory document store");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(store, identity, notifier, settings))
    }
}
