use crate::api::server::AppState;
use crate::error::ServerError;
use actix_web::{
    http::header::CONTENT_TYPE,
    web::{self, delete, get, post, put, Bytes, Data, Json, Path},
    HttpRequest, HttpResponse, Scope,
};
use serde_json::json;
use shared::models::api::{ApiListResponse, ApiResponse};
use shared::models::bootcamp::{Bootcamp, BootcampRequest, BootcampUpdate};
use shared::models::user::Role;
use shared::security::authenticate::CurrentUser;

async fn get_bootcamps(app_state: Data<AppState>) -> Result<HttpResponse, ServerError> {
    let bootcamps = app_state.store_context.bootcamp_store.get_bootcamps()?;
    Ok(ApiListResponse::ok(bootcamps).into())
}

async fn get_bootcamp(
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let bootcamp = app_state
        .store_context
        .bootcamp_store
        .get_bootcamp(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Bootcamp not found with id {id}")))?;
    Ok(ApiResponse::ok(bootcamp).into())
}

async fn create_bootcamp(
    user: CurrentUser,
    request: Json<BootcampRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    user.require_role(&[Role::Publisher, Role::Admin])?;
    let request = request.into_inner();
    if request.name.trim().is_empty() || request.description.trim().is_empty() {
        return Err(ServerError::Validation(
            "Please add a name and description".to_string(),
        ));
    }

    // Publishers can only list a single bootcamp; admins are unrestricted.
    if user.0.role == Role::Publisher
        && app_state
            .store_context
            .bootcamp_store
            .get_bootcamp_by_owner(&user.0.id)?
            .is_some()
    {
        return Err(ServerError::Validation(format!(
            "User {} has already published a bootcamp",
            user.0.id
        )));
    }

    let bootcamp = Bootcamp::new(request, &user.0.id);
    app_state
        .store_context
        .bootcamp_store
        .add_bootcamp(&bootcamp)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(bootcamp)))
}

async fn update_bootcamp(
    user: CurrentUser,
    id: Path<String>,
    update: Json<BootcampUpdate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = &app_state.store_context.bootcamp_store;
    let mut bootcamp = store
        .get_bootcamp(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Bootcamp not found with id {id}")))?;
    if !user.can_modify(&bootcamp.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to update this bootcamp",
            user.0.id
        )));
    }

    bootcamp.apply(update.into_inner());
    store.update_bootcamp(&bootcamp)?;
    Ok(ApiResponse::ok(bootcamp).into())
}

async fn delete_bootcamp(
    user: CurrentUser,
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let context = &app_state.store_context;
    let bootcamp = context
        .bootcamp_store
        .get_bootcamp(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Bootcamp not found with id {id}")))?;
    if !user.can_modify(&bootcamp.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to delete this bootcamp",
            user.0.id
        )));
    }

    // Cascade: a bootcamp takes its courses and reviews with it.
    context.course_store.delete_courses_by_bootcamp(&id)?;
    context.review_store.delete_reviews_by_bootcamp(&id)?;
    context.bootcamp_store.delete_bootcamp(&id)?;
    Ok(HttpResponse::Ok().json(json!({"success": true, "data": {}})))
}

async fn upload_photo(
    user: CurrentUser,
    id: Path<String>,
    req: HttpRequest,
    body: Bytes,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = &app_state.store_context.bootcamp_store;
    let bootcamp = store
        .get_bootcamp(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Bootcamp not found with id {id}")))?;
    if !user.can_modify(&bootcamp.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to update this bootcamp",
            user.0.id
        )));
    }

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    let ext = match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => {
            return Err(ServerError::Validation(
                "Please upload an image file".to_string(),
            ))
        }
    };
    if body.is_empty() {
        return Err(ServerError::Validation("Please upload a file".to_string()));
    }
    if body.len() > app_state.config.max_file_upload {
        return Err(ServerError::Validation(format!(
            "Please upload an image less than {} bytes",
            app_state.config.max_file_upload
        )));
    }

    let filename = format!("photo_{}.{ext}", bootcamp.id);
    let upload_dir = std::path::Path::new(&app_state.config.file_upload_path);
    std::fs::create_dir_all(upload_dir)?;
    std::fs::write(upload_dir.join(&filename), &body)?;

    store.set_photo(&bootcamp.id, &filename)?;
    Ok(HttpResponse::Ok().json(json!({"success": true, "data": filename})))
}

async fn bootcamp_courses(
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let context = &app_state.store_context;
    if context.bootcamp_store.get_bootcamp(&id)?.is_none() {
        return Err(ServerError::NotFound(format!(
            "Bootcamp not found with id {id}"
        )));
    }
    let courses = context.course_store.get_courses_by_bootcamp(&id)?;
    Ok(ApiListResponse::ok(courses).into())
}

async fn bootcamp_reviews(
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let context = &app_state.store_context;
    if context.bootcamp_store.get_bootcamp(&id)?.is_none() {
        return Err(ServerError::NotFound(format!(
            "Bootcamp not found with id {id}"
        )));
    }
    let reviews = context.review_store.get_reviews_by_bootcamp(&id)?;
    Ok(ApiListResponse::ok(reviews).into())
}

pub fn bootcamps_routes() -> Scope {
    web::scope("/bootcamps")
        .route("", get().to(get_bootcamps))
        .route("", post().to(create_bootcamp))
        .route("/{id}", get().to(get_bootcamp))
        .route("/{id}", put().to(update_bootcamp))
        .route("/{id}", delete().to(delete_bootcamp))
        .route("/{id}/photo", put().to(upload_photo))
        .route("/{id}/courses", get().to(bootcamp_courses))
        .route("/{id}/reviews", get().to(bootcamp_reviews))
}
