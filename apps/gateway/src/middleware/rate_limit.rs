//! Rate limiting middleware.
//!
//! Two instances are mounted: one wrapping the whole app (global scope) and
//! one wrapping only the AI feature scopes. Each owns an independent limiter,
//! so a globally-rejected request never touches the AI counter.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use mentora_shared::ErrorResponse;
use mentora_shared::response::RATE_LIMIT_MESSAGE;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use mentora_core::ports::{RateLimitDecision, RateLimiter};

const AI_RATE_LIMIT_MESSAGE: &str =
    "Too many AI requests from this IP, please try again later";

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    scope: &'static str,
    message: &'static str,
}

impl RateLimitMiddleware {
    /// Global scope: all routes, fixed 15-minute message.
    pub fn global(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            scope: "global",
            message: RATE_LIMIT_MESSAGE,
        }
    }

    /// AI scope: only the routes that invoke the AI provider.
    pub fn ai_scope(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            scope: "ai",
            message: AI_RATE_LIMIT_MESSAGE,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
            scope: self.scope,
            message: self.message,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<dyn RateLimiter>,
    scope: &'static str,
    message: &'static str,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Client identifier: trusted forwarded address when behind a proxy,
        // socket peer address otherwise.
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        let decision = self.limiter.admit(&key);

        if decision.allowed {
            let fut = self.service.call(req);
            Box::pin(async move {
                let mut res = fut.await?;
                append_rate_limit_headers(res.response_mut().headers_mut(), &decision);
                Ok(res.map_into_left_body())
            })
        } else {
            tracing::warn!(scope = self.scope, key = %key, "Rate limit exceeded");

            let mut response = HttpResponse::TooManyRequests()
                .insert_header(("Retry-After", decision.reset_after.as_secs().to_string()))
                .json(ErrorResponse::rate_limited(self.message));
            append_rate_limit_headers(response.headers_mut(), &decision);

            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);

            Box::pin(async move { Ok(srv_response.map_into_right_body()) })
        }
    }
}

/// Standard rate-limit headers; attached to every response passing through
/// the limiter, accepted or rejected. No legacy header variants.
fn append_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    let pairs = [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", decision.reset_after.as_secs().to_string()),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use actix_web::{App, test, web};
    use mentora_infra::rate_limit::{FixedWindowLimiter, RateLimitConfig};

    use super::*;

    fn window_limiter(max_requests: u32) -> Arc<dyn RateLimiter> {
        Arc::new(FixedWindowLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(900),
        }))
    }

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn rejects_with_429_after_threshold() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::global(window_limiter(2)))
                .route("/", web::get().to(ok)),
        )
        .await;

        for _ in 0..2 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request())
                .await;
            assert!(resp.status().is_success());
            assert!(resp.headers().contains_key("x-ratelimit-remaining"));
        }

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status().as_u16(), 429);
        assert_eq!(
            resp.headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok()),
            Some("0")
        );
        assert!(resp.headers().contains_key("retry-after"));

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], RATE_LIMIT_MESSAGE);
    }

    /// Always-allowing limiter that counts how often it was consulted.
    struct SpyLimiter {
        calls: AtomicUsize,
    }

    impl RateLimiter for SpyLimiter {
        fn admit(&self, _key: &str) -> RateLimitDecision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RateLimitDecision {
                allowed: true,
                limit: 100,
                remaining: 99,
                reset_after: Duration::from_secs(60),
            }
        }
    }

    #[actix_web::test]
    async fn exhausted_global_limit_never_reaches_ai_scope() {
        let ai_spy = Arc::new(SpyLimiter {
            calls: AtomicUsize::new(0),
        });

        let app = test::init_service(
            App::new()
                // max_requests = 0: the global window is always full.
                .wrap(RateLimitMiddleware::global(window_limiter(0)))
                .service(
                    web::scope("/generate-plan")
                        .wrap(RateLimitMiddleware::ai_scope(ai_spy.clone()))
                        .route("", web::post().to(ok)),
                ),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri("/generate-plan").to_request(),
        )
        .await;

        assert_eq!(resp.status().as_u16(), 429);
        assert_eq!(ai_spy.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn forwarded_address_is_the_limit_key() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::global(window_limiter(1)))
                .route("/", web::get().to(ok)),
        )
        .await;

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header(("X-Forwarded-For", "203.0.113.9"))
                .to_request(),
        )
        .await;
        assert!(first.status().is_success());

        // Same forwarded client: over the limit.
        let second = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header(("X-Forwarded-For", "203.0.113.9"))
                .to_request(),
        )
        .await;
        assert_eq!(second.status().as_u16(), 429);

        // Different forwarded client: its own window.
        let other = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header(("X-Forwarded-For", "198.51.100.7"))
                .to_request(),
        )
        .await;
        assert!(other.status().is_success());
    }
}
