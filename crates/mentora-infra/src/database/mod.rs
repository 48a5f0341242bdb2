//! MongoDB connection management and repositories.

mod connections;
mod documents;
mod mongo_repo;

pub use connections::{MongoConfig, MongoConnection};
pub use mongo_repo::{MongoResourceSetRepository, MongoStudyPlanRepository};
