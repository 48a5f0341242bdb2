use async_trait::async_trait;

use crate::domain::{ResourceSet, StudyPlan};
use crate::error::RepoError;

/// Study plan repository. Plans carry no uniqueness invariant.
#[async_trait]
pub trait StudyPlanRepository: Send + Sync {
    async fn save(&self, plan: StudyPlan) -> Result<StudyPlan, RepoError>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StudyPlan>, RepoError>;
}

/// Outcome of an atomic insert-if-absent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A set for the same (user_id, subject) already exists. Also returned
    /// when a concurrent request won the race between the duplicate check
    /// and the write.
    AlreadyExists,
}

/// Curated resource repository.
///
/// `insert_if_absent` is the authoritative guard for the one-set-per
/// (user_id, subject) invariant; `find_by_user_subject` is only a fast
/// path that lets handlers skip the AI call for known duplicates.
#[async_trait]
pub trait ResourceSetRepository: Send + Sync {
    async fn find_by_user_subject(
        &self,
        user_id: &str,
        subject: &str,
    ) -> Result<Option<ResourceSet>, RepoError>;

    async fn insert_if_absent(&self, set: ResourceSet) -> Result<InsertOutcome, RepoError>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ResourceSet>, RepoError>;
}
