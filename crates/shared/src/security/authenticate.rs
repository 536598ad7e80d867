use crate::models::user::{Role, UserPublic};
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    http::StatusCode,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use futures_util::future::{ready, Ready};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

pub const TOKEN_COOKIE: &str = "token";

type TokenResolver = Arc<dyn Fn(&str) -> Option<UserPublic> + Send + Sync>;

/// Resolves opaque session tokens to users. The lookup itself is owned by the
/// server's stores and injected as a closure, so this middleware stays
/// independent of any particular storage backend.
#[derive(Clone)]
pub struct AuthState {
    resolver: TokenResolver,
}

impl AuthState {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&str) -> Option<UserPublic> + Send + Sync + 'static,
    {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    pub fn resolve(&self, token: &str) -> Option<UserPublic> {
        (self.resolver)(token)
    }
}

/// The authenticated user for the current request, inserted into request
/// extensions by [`Authenticate`]. Extracting it in a handler makes that
/// route require authentication.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserPublic);

impl CurrentUser {
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AuthError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(AuthError::forbidden(format!(
                "User role {:?} is not authorized to access this route",
                self.0.role
            )))
        }
    }

    /// Owner-or-admin check used by update and delete handlers.
    pub fn can_modify(&self, owner_id: &str) -> bool {
        self.0.role == Role::Admin || self.0.id == owner_id
    }
}

impl FromRequest for CurrentUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| AuthError::unauthorized("Not authorized to access this route")),
        )
    }
}

#[derive(Debug)]
pub struct AuthError {
    status: StatusCode,
    message: String,
}

impl AuthError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(json!({
            "success": false,
            "error": self.message
        }))
    }
}

/// Pulls the session token from the `Authorization: Bearer` header or the
/// `token` cookie.
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(header) = req.headers().get(AUTHORIZATION) {
        if let Ok(value) = header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }
    req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string())
}

/// Authentication middleware. Resolves the session token (if any) and makes
/// the user available to handlers via the [`CurrentUser`] extractor. Requests
/// without a valid token pass through anonymously; protected handlers reject
/// them when extraction fails.
pub struct Authenticate {
    state: Arc<AuthState>,
}

impl Authenticate {
    pub fn new(state: Arc<AuthState>) -> Self {
        Self { state }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthenticateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service,
            state: self.state.clone(),
        }))
    }
}

pub struct AuthenticateMiddleware<S> {
    service: S,
    state: Arc<AuthState>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = extract_token(req.request()) {
            if let Some(user) = self.state.resolve(&token) {
                req.extensions_mut().insert(CurrentUser(user));
            }
        }
        self.service.call(req)
    }
}
