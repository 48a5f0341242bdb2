//! Resource curation handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use mentora_core::domain::{CuratedResource, ResourceSet};
use mentora_core::ports::{AiRequest, InsertOutcome};
use mentora_shared::ApiResponse;
use mentora_shared::dto::{CurateResourcesRequest, ResourceDto, ResourceSetDto};

use crate::handlers::strip_code_fences;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const CURATE_SYSTEM_PROMPT: &str = "You curate learning resources. Respond with a JSON array of \
objects of the shape {\"title\": string, \"description\": string, \"type\": string, \
\"link\": string}. Five to eight entries, reputable sources only. No markdown, no commentary.";

/// Shape the AI provider is asked to produce.
#[derive(Debug, Deserialize)]
struct ResourceDraft {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type", default)]
    kind: String,
    link: String,
}

/// POST /curate-resources
///
/// Duplicate suppression: the pre-check fails fast without spending an AI
/// call; the store-level insert-if-absent closes the remaining race window
/// between check and write.
pub async fn curate_resources(
    state: web::Data<AppState>,
    body: web::Json<CurateResourcesRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id is required".to_string()));
    }
    let subject = req.subject.trim();
    if subject.is_empty() {
        return Err(AppError::BadRequest("subject is required".to_string()));
    }

    let subject_key = ResourceSet::normalize_subject(subject);
    if state
        .resource_sets
        .find_by_user_subject(&req.user_id, &subject_key)
        .await?
        .is_some()
    {
        return Err(AppError::ResourceExists(exists_message(subject)));
    }

    let completion = state
        .ai
        .complete(AiRequest {
            system: Some(CURATE_SYSTEM_PROMPT.to_string()),
            prompt: format!("Curate learning resources for the subject \"{subject}\"."),
            max_tokens: Some(1200),
        })
        .await?;

    let resources = parse_resources(&completion.content)?;
    let set = ResourceSet::new(req.user_id, subject, resources);

    match state.resource_sets.insert_if_absent(set.clone()).await? {
        InsertOutcome::Inserted => {
            tracing::info!(user_id = %set.user_id, subject = %set.subject, "Resources curated");
            Ok(HttpResponse::Created().json(ApiResponse::ok(resource_set_dto(set))))
        }
        // A concurrent request won the race between check and write.
        InsertOutcome::AlreadyExists => Err(AppError::ResourceExists(exists_message(subject))),
    }
}

/// GET /curate-resources/{user_id}
pub async fn list_for_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    let sets = state.resource_sets.find_by_user(&user_id).await?;
    let dtos: Vec<ResourceSetDto> = sets.into_iter().map(resource_set_dto).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(dtos)))
}

fn exists_message(subject: &str) -> String {
    format!("Resources for \"{subject}\" have already been curated for this user")
}

fn parse_resources(content: &str) -> Result<Vec<CuratedResource>, AppError> {
    let drafts: Vec<ResourceDraft> = serde_json::from_str(strip_code_fences(content))
        .map_err(|e| AppError::Upstream(format!("unparseable resource payload: {e}")))?;
    if drafts.is_empty() {
        return Err(AppError::Upstream(
            "AI provider returned an empty resource list".to_string(),
        ));
    }
    Ok(drafts
        .into_iter()
        .map(|d| CuratedResource {
            title: d.title,
            description: d.description,
            kind: d.kind,
            link: d.link,
        })
        .collect())
}

fn resource_set_dto(set: ResourceSet) -> ResourceSetDto {
    ResourceSetDto {
        id: set.id.to_string(),
        user_id: set.user_id,
        subject: set.subject,
        resources: set
            .resources
            .into_iter()
            .map(|r| ResourceDto {
                title: r.title,
                description: r.description,
                kind: r.kind,
                link: r.link,
            })
            .collect(),
        created_at: set.created_at.to_rfc3339(),
    }
}
