use crate::api::routes::auth::auth_routes;
use crate::api::routes::bootcamps::bootcamps_routes;
use crate::api::routes::courses::courses_routes;
use crate::api::routes::reviews::reviews_routes;
use crate::api::routes::users::users_routes;
use crate::config::Config;
use crate::fatal::FatalSender;
use crate::store::core::StoreContext;
use actix_files::Files;
use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::middleware::{Compress, Condition, Logger, NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::Utc;
use log::info;
use serde_json::json;
use shared::security::authenticate::{AuthState, Authenticate};
use shared::security::headers::security_headers;
use shared::security::sanitize::SanitizeInput;
use std::sync::Arc;

const JSON_BODY_LIMIT: usize = 1_048_576;

pub struct AppState {
    pub store_context: Arc<StoreContext>,
    pub config: Arc<Config>,
    pub fatal: FatalSender,
}

/// Token resolution backed by the session and user stores.
pub fn build_auth_state(store_context: Arc<StoreContext>) -> Arc<AuthState> {
    Arc::new(AuthState::new(move |token| {
        let session = store_context.session_store.get_session(token).ok().flatten()?;
        if session.is_expired(Utc::now()) {
            return None;
        }
        let user = store_context
            .user_store
            .get_user(&session.user_id)
            .ok()
            .flatten()?;
        Some(user.public())
    }))
}

/// JSON extractor config whose failures render the standard envelope
/// instead of actix's bare error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            let body = json!({"success": false, "error": err.to_string()});
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

/// Builds the listening server without awaiting it, so the supervisory task
/// in `main` keeps ownership of the handle for graceful shutdown.
pub fn build_server(
    config: Arc<Config>,
    store_context: Arc<StoreContext>,
    fatal: FatalSender,
) -> std::io::Result<Server> {
    info!("Starting server at http://0.0.0.0:{}", config.port);

    let app_state = web::Data::new(AppState {
        store_context: store_context.clone(),
        config: config.clone(),
        fatal,
    });
    let auth_state = build_auth_state(store_context);
    let dev_logging = config.is_development();
    let api_prefix = config.api_prefix.clone();
    let public_dir = config.public_dir.clone();
    // The extractor cap must sit above `max_file_upload` so oversized photo
    // uploads reach the handler and get its enveloped response.
    let max_payload = config.max_file_upload.saturating_mul(2);
    let port = config.port;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(json_config())
            .app_data(web::PayloadConfig::default().limit(max_payload))
            .wrap(Condition::new(dev_logging, Logger::default()))
            .wrap(SanitizeInput)
            .wrap(security_headers())
            .wrap(Compress::default())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .service(
                web::scope(&api_prefix)
                    .wrap(Authenticate::new(auth_state.clone()))
                    .service(bootcamps_routes())
                    .service(courses_routes())
                    .service(auth_routes())
                    .service(users_routes())
                    .service(reviews_routes()),
            )
            .service(Files::new("/", &public_dir).index_file("index.html"))
            .default_service(web::route().to(not_found))
    })
    .bind(("0.0.0.0", port))?
    .run();

    Ok(server)
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": "Resource not found"
    }))
}
