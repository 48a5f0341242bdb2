use std::time::Duration;

use mongodb::bson::doc;
use mongodb::event::EventHandler;
use mongodb::event::sdam::SdamEvent;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use mentora_core::error::RepoError;

/// Configuration for the MongoDB connection.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    /// How long the driver may look for a reachable server.
    pub server_selection_timeout: Duration,
    pub connect_timeout: Duration,
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            server_selection_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Connection handle to the document store.
pub struct MongoConnection {
    pub client: Client,
    pub db: Database,
}

impl MongoConnection {
    /// Connect with bounded timeouts and verify reachability with a ping.
    ///
    /// The driver connects lazily; the ping turns an unreachable store into
    /// an immediate startup failure instead of a failure on the first query.
    pub async fn init(config: &MongoConfig) -> Result<Self, RepoError> {
        tracing::info!("Initializing MongoDB connection...");

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.connect_timeout = Some(config.connect_timeout);

        // Post-startup disconnects are logged, never fatal; requests that
        // hit the store while it is unreachable fail per-request.
        options.sdam_event_handler = Some(EventHandler::callback(|event: SdamEvent| {
            if let SdamEvent::ServerHeartbeatFailed(failed) = event {
                tracing::warn!(error = %failed.failure, "MongoDB heartbeat failed");
            }
        }));

        let client =
            Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;
        let db = client.database(&config.database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        tracing::info!(database = %config.database, "Connected to MongoDB");

        Ok(Self { client, db })
    }
}
