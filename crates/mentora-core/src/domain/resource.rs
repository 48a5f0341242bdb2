use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single curated learning resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedResource {
    pub title: String,
    pub description: String,
    /// Resource kind, e.g. "video", "article", "course".
    pub kind: String,
    pub link: String,
}

/// ResourceSet entity - the curated resources for one (user, subject) pair.
///
/// Invariant: at most one set may exist per (user_id, subject). The subject
/// stored here is the normalized uniqueness key, not the raw client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSet {
    pub id: Uuid,
    pub user_id: String,
    pub subject: String,
    pub resources: Vec<CuratedResource>,
    pub created_at: DateTime<Utc>,
}

impl ResourceSet {
    /// Create a new set, normalizing the subject into its uniqueness key.
    pub fn new(user_id: String, subject: &str, resources: Vec<CuratedResource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            subject: Self::normalize_subject(subject),
            resources,
            created_at: Utc::now(),
        }
    }

    /// Normalized uniqueness key for a subject: trimmed, case-folded.
    ///
    /// "Linear Algebra" and " linear algebra " address the same set.
    pub fn normalize_subject(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}
