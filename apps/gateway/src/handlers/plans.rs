//! Study plan generation handler.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use mentora_core::domain::{Milestone, StudyPlan};
use mentora_core::ports::AiRequest;
use mentora_shared::ApiResponse;
use mentora_shared::dto::{GeneratePlanRequest, MilestoneDto, StudyPlanDto};

use crate::handlers::strip_code_fences;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_WEEKS: u32 = 52;
const MAX_HOURS_PER_WEEK: u32 = 80;
const DEFAULT_WEEKS: u32 = 4;
const DEFAULT_HOURS_PER_WEEK: u32 = 5;

const PLAN_SYSTEM_PROMPT: &str = "You are a study plan generator. Respond with a single JSON \
object of the shape {\"overview\": string, \"milestones\": [{\"title\": string, \
\"description\": string, \"week\": number}]}. No markdown, no commentary.";

/// Shape the AI provider is asked to produce.
#[derive(Debug, Deserialize)]
struct PlanDraft {
    overview: String,
    #[serde(default)]
    milestones: Vec<MilestoneDraft>,
}

#[derive(Debug, Deserialize)]
struct MilestoneDraft {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_week")]
    week: u32,
}

fn default_week() -> u32 {
    1
}

/// POST /generate-plan
pub async fn generate_plan(
    state: web::Data<AppState>,
    body: web::Json<GeneratePlanRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id is required".to_string()));
    }
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(AppError::BadRequest("topic is required".to_string()));
    }
    let weeks = req.weeks.unwrap_or(DEFAULT_WEEKS);
    if !(1..=MAX_WEEKS).contains(&weeks) {
        return Err(AppError::BadRequest(format!(
            "weeks must be between 1 and {MAX_WEEKS}"
        )));
    }
    let hours_per_week = req.hours_per_week.unwrap_or(DEFAULT_HOURS_PER_WEEK);
    if !(1..=MAX_HOURS_PER_WEEK).contains(&hours_per_week) {
        return Err(AppError::BadRequest(format!(
            "hours_per_week must be between 1 and {MAX_HOURS_PER_WEEK}"
        )));
    }

    // One AI call per request, no retries.
    let prompt = build_prompt(topic, req.level.as_deref(), weeks, hours_per_week);
    let completion = state
        .ai
        .complete(AiRequest {
            system: Some(PLAN_SYSTEM_PROMPT.to_string()),
            prompt,
            max_tokens: Some(1500),
        })
        .await?;

    let draft = parse_plan(&completion.content)?;

    let plan = StudyPlan::new(
        req.user_id,
        topic.to_string(),
        req.level,
        weeks,
        hours_per_week,
        draft.overview,
        draft
            .milestones
            .into_iter()
            .map(|m| Milestone {
                title: m.title,
                description: m.description,
                week: m.week,
            })
            .collect(),
    );

    let saved = state.plans.save(plan).await?;

    tracing::info!(user_id = %saved.user_id, plan_id = %saved.id, "Study plan generated");

    Ok(HttpResponse::Created().json(ApiResponse::ok(plan_dto(saved))))
}

/// GET /generate-plan/{user_id}
pub async fn list_for_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    let plans = state.plans.find_by_user(&user_id).await?;
    let dtos: Vec<StudyPlanDto> = plans.into_iter().map(plan_dto).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(dtos)))
}

fn build_prompt(topic: &str, level: Option<&str>, weeks: u32, hours_per_week: u32) -> String {
    let level = level.unwrap_or("unspecified");
    format!(
        "Create a study plan for the topic \"{topic}\". Learner level: {level}. \
Duration: {weeks} weeks at {hours_per_week} hours per week. \
Produce one milestone per week."
    )
}

fn parse_plan(content: &str) -> Result<PlanDraft, AppError> {
    serde_json::from_str(strip_code_fences(content))
        .map_err(|e| AppError::Upstream(format!("unparseable plan payload: {e}")))
}

fn plan_dto(plan: StudyPlan) -> StudyPlanDto {
    StudyPlanDto {
        id: plan.id.to_string(),
        user_id: plan.user_id,
        topic: plan.topic,
        level: plan.level,
        weeks: plan.weeks,
        hours_per_week: plan.hours_per_week,
        overview: plan.overview,
        milestones: plan
            .milestones
            .into_iter()
            .map(|m| MilestoneDto {
                title: m.title,
                description: m.description,
                week: m.week,
            })
            .collect(),
        created_at: plan.created_at.to_rfc3339(),
    }
}
