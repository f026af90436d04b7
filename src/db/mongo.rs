use log::{info, warn};
use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::MongoConfig;

/// Builds the process-wide client and verifies it with a `ping`.
///
/// Called once from `main`; the returned handle is cloned into the store.
pub async fn create_mongo_client(config: &MongoConfig) -> mongodb::error::Result<Arc<Client>> {
    let mut client_options = ClientOptions::parse(&config.uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    if let Err(err) = client.database("admin").run_command(doc! { "ping": 1 }).await {
        warn!("Connected to MongoDB but ping failed: {}", err);
        return Err(err);
    }
    info!("Successfully connected to MongoDB and verified with ping command");

    Ok(Arc::new(client))
}

/// Database to use: explicit config, then the one named in the URI.
pub fn database_name(client: &Client, config: &MongoConfig) -> String {
    let from_uri = client.default_database().map(|db| db.name().to_string());
    config.database_or(from_uri.as_deref())
}
