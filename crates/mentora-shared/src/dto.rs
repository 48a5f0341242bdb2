//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to generate a study plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    pub user_id: String,
    pub topic: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub weeks: Option<u32>,
    #[serde(default)]
    pub hours_per_week: Option<u32>,
}

/// A single milestone within a generated plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneDto {
    pub title: String,
    pub description: String,
    pub week: u32,
}

/// Response containing a generated study plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlanDto {
    pub id: String,
    pub user_id: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub weeks: u32,
    pub hours_per_week: u32,
    pub overview: String,
    pub milestones: Vec<MilestoneDto>,
    pub created_at: String,
}

/// Request to curate learning resources for a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurateResourcesRequest {
    pub user_id: String,
    pub subject: String,
}

/// A single curated resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDto {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: String,
}

/// Response containing the curated resources for one (user, subject) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSetDto {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub resources: Vec<ResourceDto>,
    pub created_at: String,
}

/// Request to store an extracted document for later Q&A.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDocumentRequest {
    #[serde(default)]
    pub filename: Option<String>,
    /// Extracted document text.
    pub content: String,
}

/// Response carrying the handle for a stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDocumentResponse {
    pub document_id: String,
}

/// Request for a document-grounded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfChatRequest {
    pub document_id: String,
    pub question: String,
}

/// Response containing the provider's answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfChatResponse {
    pub answer: String,
}
