//! Document-grounded Q&A handlers.
//!
//! Documents arrive as already-extracted text and are stored as flat files
//! under the uploads directory, which the lifecycle supervisor provisions
//! before the server starts accepting requests.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use mentora_core::ports::AiRequest;
use mentora_shared::ApiResponse;
use mentora_shared::dto::{
    PdfChatRequest, PdfChatResponse, UploadDocumentRequest, UploadDocumentResponse,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Cap on how much document text is forwarded to the provider.
const MAX_CONTEXT_CHARS: usize = 24_000;

const PDF_SYSTEM_PROMPT: &str = "You answer questions strictly from the supplied document \
excerpt. If the excerpt does not contain the answer, say so.";

/// POST /pdf/upload
pub async fn upload(
    state: web::Data<AppState>,
    body: web::Json<UploadDocumentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "document content is empty".to_string(),
        ));
    }

    let document_id = Uuid::new_v4().to_string();
    let path = state.uploads_dir.join(format!("{document_id}.txt"));
    tokio::fs::write(&path, &req.content)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store document: {e}")))?;

    tracing::info!(
        document_id = %document_id,
        filename = req.filename.as_deref().unwrap_or("unnamed"),
        "Document stored"
    );

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        UploadDocumentResponse { document_id },
        "Document uploaded",
    )))
}

/// POST /pdf/chat
pub async fn chat(
    state: web::Data<AppState>,
    body: web::Json<PdfChatRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if !is_valid_document_id(&req.document_id) {
        return Err(AppError::BadRequest("invalid document id".to_string()));
    }
    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("question is required".to_string()));
    }

    let path = state.uploads_dir.join(format!("{}.txt", req.document_id));
    let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound("document not found".to_string())
        } else {
            AppError::Internal(format!("failed to read document: {e}"))
        }
    })?;

    let excerpt = truncate_chars(&content, MAX_CONTEXT_CHARS);
    let completion = state
        .ai
        .complete(AiRequest {
            system: Some(PDF_SYSTEM_PROMPT.to_string()),
            prompt: format!("Document excerpt:\n{excerpt}\n\nQuestion: {question}"),
            max_tokens: Some(800),
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PdfChatResponse {
        answer: completion.content,
    })))
}

/// Document ids are UUIDs we issued; anything with path syntax is rejected
/// so a crafted id can never escape the uploads directory.
fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};

    use crate::handlers::test_support::{InMemoryPlans, InMemoryResourceSets, StubAi, state_with};
    use crate::state::AppState;

    use super::*;

    fn pdf_state(ai: Arc<StubAi>) -> AppState {
        state_with(
            Arc::new(InMemoryPlans::default()),
            Arc::new(InMemoryResourceSets::default()),
            ai,
        )
    }

    macro_rules! pdf_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .route("/pdf/upload", web::post().to(upload))
                    .route("/pdf/chat", web::post().to(chat)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn upload_then_chat_round_trip() {
        let ai = Arc::new(StubAi::new("The grace period is 30 days."));
        let app = pdf_app!(pdf_state(ai.clone()));

        let upload_resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pdf/upload")
                .set_json(serde_json::json!({
                    "filename": "policy.pdf",
                    "content": "Section 4: the grace period is 30 days."
                }))
                .to_request(),
        )
        .await;
        assert_eq!(upload_resp.status().as_u16(), 201);
        let upload_body: serde_json::Value = test::read_body_json(upload_resp).await;
        assert_eq!(upload_body["success"], true);
        assert_eq!(upload_body["message"], "Document uploaded");
        let document_id = upload_body["data"]["document_id"].as_str().unwrap().to_string();

        let chat_resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pdf/chat")
                .set_json(serde_json::json!({
                    "document_id": document_id,
                    "question": "How long is the grace period?"
                }))
                .to_request(),
        )
        .await;
        assert!(chat_resp.status().is_success());
        let chat_body: serde_json::Value = test::read_body_json(chat_resp).await;
        assert_eq!(chat_body["data"]["answer"], "The grace period is 30 days.");
        assert_eq!(ai.call_count(), 1);
    }

    #[actix_web::test]
    async fn traversal_document_id_is_rejected() {
        let ai = Arc::new(StubAi::new("answer"));
        let app = pdf_app!(pdf_state(ai.clone()));

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pdf/chat")
                .set_json(serde_json::json!({
                    "document_id": "../../etc/passwd",
                    "question": "q"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status().as_u16(), 400);
        assert_eq!(ai.call_count(), 0);
    }

    #[actix_web::test]
    async fn unknown_document_is_a_404() {
        let ai = Arc::new(StubAi::new("answer"));
        let app = pdf_app!(pdf_state(ai));

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pdf/chat")
                .set_json(serde_json::json!({
                    "document_id": Uuid::new_v4().to_string(),
                    "question": "q"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status().as_u16(), 404);
    }

    #[::core::prelude::v1::test]
    fn document_id_validation() {
        assert!(is_valid_document_id(
            "0a1b2c3d-1111-2222-3333-444455556666"
        ));
        assert!(!is_valid_document_id(""));
        assert!(!is_valid_document_id("../secret"));
        assert!(!is_valid_document_id("/etc/passwd"));
        assert!(!is_valid_document_id("a/b"));
    }

    #[::core::prelude::v1::test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
