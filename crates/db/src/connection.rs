use std::time::Duration;

use mongodb::{Client, Database, options::ClientOptions};
use taskboard_config::DatabaseSettings;
use tracing::info;

const APP_NAME: &str = "taskboard";

/// Client options for `settings`. Parsing a plain `mongodb://` URL does no I/O.
pub async fn client_options(settings: &DatabaseSettings) -> Result<ClientOptions, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&settings.url).await?;

    options.app_name = Some(APP_NAME.to_string());
    options.server_selection_timeout = Some(Duration::from_millis(settings.connect_timeout_ms));
    options.max_pool_size = settings.max_pool_size.or(options.max_pool_size);
    options.min_pool_size = settings.min_pool_size.or(options.min_pool_size);

    Ok(options)
}

/// Connects and pings the configured database, so an unreachable server fails
/// here rather than on the first board read.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_options(client_options(settings).await?)?;
    let db = client.database(&settings.name);

    db.run_command(bson::doc! { "ping": 1 }).await?;
    info!(db = %settings.name, "Connected to MongoDB");

    Ok(db)
}
