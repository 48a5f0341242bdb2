//! MongoDB-backed repository implementations.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use mentora_core::domain::{ResourceSet, StudyPlan};
use mentora_core::error::RepoError;
use mentora_core::ports::{InsertOutcome, ResourceSetRepository, StudyPlanRepository};

use super::documents::{ResourceSetDoc, StudyPlanDoc};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

pub struct MongoStudyPlanRepository {
    collection: Collection<StudyPlanDoc>,
}

impl MongoStudyPlanRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("study_plans"),
        }
    }
}

#[async_trait]
impl StudyPlanRepository for MongoStudyPlanRepository {
    async fn save(&self, plan: StudyPlan) -> Result<StudyPlan, RepoError> {
        let document = StudyPlanDoc::from(&plan);
        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(plan)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StudyPlan>, RepoError> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let documents: Vec<StudyPlanDoc> = cursor
            .try_collect()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        documents.into_iter().map(|d| d.into_domain()).collect()
    }
}

pub struct MongoResourceSetRepository {
    collection: Collection<ResourceSetDoc>,
}

impl MongoResourceSetRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("resource_sets"),
        }
    }

    /// Create the unique `(user_id, subject)` index. Idempotent; run at
    /// startup so `insert_if_absent` can rely on the constraint.
    pub async fn ensure_indexes(&self) -> Result<(), RepoError> {
        let index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "subject": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ResourceSetRepository for MongoResourceSetRepository {
    async fn find_by_user_subject(
        &self,
        user_id: &str,
        subject: &str,
    ) -> Result<Option<ResourceSet>, RepoError> {
        let found = self
            .collection
            .find_one(doc! { "user_id": user_id, "subject": subject })
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        found.map(|d| d.into_domain()).transpose()
    }

    async fn insert_if_absent(&self, set: ResourceSet) -> Result<InsertOutcome, RepoError> {
        let document = ResourceSetDoc::from(&set);
        match self.collection.insert_one(&document).await {
            Ok(_) => Ok(InsertOutcome::Inserted),
            // The unique index turns the check-then-write race into a
            // deterministic loser: the second writer sees a duplicate key.
            Err(e) if is_duplicate_key(&e) => Ok(InsertOutcome::AlreadyExists),
            Err(e) => Err(RepoError::Query(e.to_string())),
        }
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ResourceSet>, RepoError> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let documents: Vec<ResourceSetDoc> = cursor
            .try_collect()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        documents.into_iter().map(|d| d.into_domain()).collect()
    }
}
