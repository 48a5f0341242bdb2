//! HTTP handlers and route configuration.

mod health;
mod pdf_chat;
mod plans;
mod resources;

use std::sync::Arc;

use actix_web::web;

use mentora_core::ports::RateLimiter;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// The AI limiter wraps only the two feature scopes that invoke the AI
/// provider; the global limiter is mounted at the app level in `main`, so it
/// always runs first.
pub fn configure_routes(cfg: &mut web::ServiceConfig, ai_limiter: Arc<dyn RateLimiter>) {
    cfg.route("/", web::get().to(health::health_check))
        .service(
            web::scope("/generate-plan")
                .wrap(RateLimitMiddleware::ai_scope(ai_limiter.clone()))
                .route("", web::post().to(plans::generate_plan))
                .route("/{user_id}", web::get().to(plans::list_for_user)),
        )
        .service(
            web::scope("/curate-resources")
                .wrap(RateLimitMiddleware::ai_scope(ai_limiter))
                .route("", web::post().to(resources::curate_resources))
                .route("/{user_id}", web::get().to(resources::list_for_user)),
        )
        .service(
            web::scope("/pdf")
                .route("/upload", web::post().to(pdf_chat::upload))
                .route("/chat", web::post().to(pdf_chat::chat)),
        );
}

/// AI responses are requested as bare JSON but models still wrap payloads in
/// markdown fences often enough that we strip them before parsing.
pub(crate) fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use mentora_core::domain::{ResourceSet, StudyPlan};
    use mentora_core::error::RepoError;
    use mentora_core::ports::{
        AiError, AiProvider, AiRequest, AiResponse, InsertOutcome, ResourceSetRepository,
        StudyPlanRepository,
    };

    use crate::state::AppState;

    #[derive(Default)]
    pub struct InMemoryPlans {
        pub plans: Mutex<Vec<StudyPlan>>,
    }

    #[async_trait]
    impl StudyPlanRepository for InMemoryPlans {
        async fn save(&self, plan: StudyPlan) -> Result<StudyPlan, RepoError> {
            self.plans.lock().unwrap().push(plan.clone());
            Ok(plan)
        }

        async fn find_by_user(&self, user_id: &str) -> Result<Vec<StudyPlan>, RepoError> {
            Ok(self
                .plans
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub struct InMemoryResourceSets {
        pub sets: Mutex<Vec<ResourceSet>>,
        /// When set, `insert_if_absent` reports a lost race even though the
        /// duplicate pre-check saw nothing.
        pub force_insert_conflict: bool,
    }

    #[async_trait]
    impl ResourceSetRepository for InMemoryResourceSets {
        async fn find_by_user_subject(
            &self,
            user_id: &str,
            subject: &str,
        ) -> Result<Option<ResourceSet>, RepoError> {
            Ok(self
                .sets
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.user_id == user_id && s.subject == subject)
                .cloned())
        }

        async fn insert_if_absent(&self, set: ResourceSet) -> Result<InsertOutcome, RepoError> {
            if self.force_insert_conflict {
                return Ok(InsertOutcome::AlreadyExists);
            }
            let mut sets = self.sets.lock().unwrap();
            if sets
                .iter()
                .any(|s| s.user_id == set.user_id && s.subject == set.subject)
            {
                return Ok(InsertOutcome::AlreadyExists);
            }
            sets.push(set);
            Ok(InsertOutcome::Inserted)
        }

        async fn find_by_user(&self, user_id: &str) -> Result<Vec<ResourceSet>, RepoError> {
            Ok(self
                .sets
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    /// Canned-response provider that counts outbound calls.
    pub struct StubAi {
        pub content: String,
        pub calls: AtomicUsize,
    }

    impl StubAi {
        pub fn new(content: impl Into<String>) -> Self {
            Self {
                content: content.into(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AiProvider for StubAi {
        async fn complete(&self, _request: AiRequest) -> Result<AiResponse, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AiResponse {
                content: self.content.clone(),
            })
        }
    }

    /// Provider that always reports an exhausted quota.
    pub struct QuotaExhaustedAi;

    #[async_trait]
    impl AiProvider for QuotaExhaustedAi {
        async fn complete(&self, _request: AiRequest) -> Result<AiResponse, AiError> {
            Err(AiError::QuotaExceeded)
        }
    }

    pub fn temp_uploads_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mentora-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn state_with(
        plans: Arc<InMemoryPlans>,
        resource_sets: Arc<InMemoryResourceSets>,
        ai: Arc<dyn AiProvider>,
    ) -> AppState {
        AppState {
            plans,
            resource_sets,
            ai,
            uploads_dir: temp_uploads_dir(),
        }
    }
}
