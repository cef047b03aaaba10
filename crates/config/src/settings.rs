use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub sync: SyncSettings,
    pub identity: IdentitySettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: StoreBackend,
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
    /// How long to wait for a reachable server before giving up.
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncSettings {
    /// Pending mutations a single board session will hold before callers wait.
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    pub user_id: Option<String>,
}

impl Settings {
    /// Settings for the binary: files, then `TASKBOARD__*` env vars, over
    /// defaults that point at a local MongoDB.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("TASKBOARD"),
            );

        with_defaults(builder)?.build()?.try_deserialize()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("database.backend", "mongo")?
        .set_default("database.url", "mongodb://localhost:27017")?
        .set_default("database.name", "taskboard")?
        .set_default("database.connect_timeout_ms", 5000)?
        .set_default("sync.queue_capacity", 32)?
        .set_default("identity.user_id", None::<String>)
}

/// In-memory store, for tests and embedding. Nothing outlives the process.
impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                backend: StoreBackend::Memory,
                url: "mongodb://localhost:27017".to_string(),
                name: "taskboard".to_string(),
                max_pool_size: None,
                min_pool_size: None,
                connect_timeout_ms: 5000,
            },
            sync: SyncSettings { queue_capacity: 32 },
            identity: IdentitySettings { user_id: None },
        }
    }
}
