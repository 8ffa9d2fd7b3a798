/// HTTP middleware for post-service
///
/// Resolves the caller identity from a JWT and exposes it to handlers through
/// the `UserId` extractor. Requests without a valid token never reach a handler.
use crate::error::AppError;
use crate::security::JwtKeys;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Header the web client sends its token in
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

// =====================================================================
// JWT Authentication
// =====================================================================

/// Extracted user identifier stored in request extensions after auth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Actix middleware that verifies the request token and records the caller.
pub struct JwtAuthMiddleware {
    keys: Arc<JwtKeys>,
}

impl JwtAuthMiddleware {
    pub fn new(keys: Arc<JwtKeys>) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    keys: Arc<JwtKeys>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let keys = self.keys.clone();

        Box::pin(async move {
            let token = request_token(&req)
                .ok_or(AppError::Unauthenticated("No token, authorization denied"))?;

            let claims = keys.verify(&token).map_err(|err| {
                tracing::debug!(error = %err, "token verification failed");
                AppError::Unauthenticated("Token is not valid")
            })?;

            let user_id = Uuid::parse_str(&claims.sub)
                .map_err(|_| AppError::Unauthenticated("Token is not valid"))?;

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

/// Token from `x-auth-token`, falling back to `Authorization: Bearer`.
fn request_token(req: &ServiceRequest) -> Option<String> {
    let headers = req.headers();

    if let Some(token) = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .ok_or_else(|| AppError::Unauthenticated("No token, authorization denied").into()),
        )
    }
}

// =====================================================================
// Request timing
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &res {
                Ok(resp) => tracing::debug!(
                    %method,
                    %path,
                    status = resp.status().as_u16(),
                    elapsed_ms,
                    "request completed"
                ),
                Err(err) => tracing::debug!(
                    %method,
                    %path,
                    status = err.as_response_error().status_code().as_u16(),
                    elapsed_ms,
                    "request rejected"
                ),
            }
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use chrono::Duration;

    async fn whoami(user_id: UserId) -> HttpResponse {
        HttpResponse::Ok().body(user_id.0.to_string())
    }

    fn keys() -> Arc<JwtKeys> {
        Arc::new(JwtKeys::from_secret("middleware-test-secret"))
    }

    #[actix_web::test]
    async fn accepts_x_auth_token_header() {
        let keys = keys();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::new(keys.clone()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, Duration::hours(1)).unwrap();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTH_TOKEN_HEADER, token))
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn accepts_bearer_authorization() {
        let keys = keys();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::new(keys.clone()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let token = keys.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::new(keys()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let err = test::try_call_service(&app, req)
            .await
            .err()
            .expect("request without token must fail");
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(err.to_string(), "No token, authorization denied");
    }

    #[actix_web::test]
    async fn token_with_non_uuid_subject_is_rejected() {
        let secret = "middleware-test-secret";
        let now = chrono::Utc::now().timestamp();
        let claims = crate::security::Claims {
            sub: "not-a-uuid".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::new(Arc::new(JwtKeys::from_secret(secret))))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTH_TOKEN_HEADER, token))
            .to_request();
        let err = test::try_call_service(&app, req)
            .await
            .err()
            .expect("non-uuid subject must fail");
        assert_eq!(err.to_string(), "Token is not valid");
    }
}
