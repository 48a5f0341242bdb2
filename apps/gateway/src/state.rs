//! Application state - shared across all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use mentora_core::ports::{AiProvider, ResourceSetRepository, StudyPlanRepository};
use mentora_infra::ai::HttpAiProvider;
use mentora_infra::database::{
    MongoConfig, MongoConnection, MongoResourceSetRepository, MongoStudyPlanRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub plans: Arc<dyn StudyPlanRepository>,
    pub resource_sets: Arc<dyn ResourceSetRepository>,
    pub ai: Arc<dyn AiProvider>,
    pub uploads_dir: PathBuf,
}

impl AppState {
    /// Build the application state. Any failure here is a startup failure:
    /// the caller logs it and terminates without binding the port.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let mongo_config = MongoConfig::new(config.mongodb_uri.as_str(), config.mongodb_db.as_str());
        let mongo = MongoConnection::init(&mongo_config).await?;

        let plans = MongoStudyPlanRepository::new(&mongo.db);
        let resource_sets = MongoResourceSetRepository::new(&mongo.db);
        // The unique (user_id, subject) index must exist before serving.
        resource_sets.ensure_indexes().await?;

        let ai = HttpAiProvider::new(config.ai.clone())?;

        tracing::info!("Application state initialized");

        Ok(Self {
            plans: Arc::new(plans),
            resource_sets: Arc::new(resource_sets),
            ai: Arc::new(ai),
            uploads_dir: config.uploads_dir.clone(),
        })
    }
}
