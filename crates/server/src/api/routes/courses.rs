use crate::api::server::AppState;
use crate::error::ServerError;
use actix_web::{
    web::{self, delete, get, post, put, Data, Json, Path},
    HttpResponse, Scope,
};
use serde_json::json;
use shared::models::api::{ApiListResponse, ApiResponse};
use shared::models::course::{Course, CourseRequest, CourseUpdate};
use shared::models::user::Role;
use shared::security::authenticate::CurrentUser;

async fn get_courses(app_state: Data<AppState>) -> Result<HttpResponse, ServerError> {
    let courses = app_state.store_context.course_store.get_courses()?;
    Ok(ApiListResponse::ok(courses).into())
}

async fn get_course(
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let course = app_state
        .store_context
        .course_store
        .get_course(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Course not found with id {id}")))?;
    Ok(ApiResponse::ok(course).into())
}

async fn create_course(
    user: CurrentUser,
    request: Json<CourseRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    user.require_role(&[Role::Publisher, Role::Admin])?;
    let request = request.into_inner();
    if request.title.trim().is_empty() || request.description.trim().is_empty() {
        return Err(ServerError::Validation(
            "Please add a title and description".to_string(),
        ));
    }

    let context = &app_state.store_context;
    let bootcamp = context
        .bootcamp_store
        .get_bootcamp(&request.bootcamp_id)?
        .ok_or_else(|| {
            ServerError::NotFound(format!("Bootcamp not found with id {}", request.bootcamp_id))
        })?;
    if !user.can_modify(&bootcamp.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to add a course to this bootcamp",
            user.0.id
        )));
    }

    let course = Course::new(request, &user.0.id);
    context.course_store.add_course(&course)?;
    context.refresh_average_cost(&course.bootcamp_id)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(course)))
}

async fn update_course(
    user: CurrentUser,
    id: Path<String>,
    update: Json<CourseUpdate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let context = &app_state.store_context;
    let mut course = context
        .course_store
        .get_course(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Course not found with id {id}")))?;
    if !user.can_modify(&course.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to update this course",
            user.0.id
        )));
    }

    course.apply(update.into_inner());
    context.course_store.update_course(&course)?;
    context.refresh_average_cost(&course.bootcamp_id)?;
    Ok(ApiResponse::ok(course).into())
}

async fn delete_course(
    user: CurrentUser,
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let context = &app_state.store_context;
    let course = context
        .course_store
        .get_course(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Course not found with id {id}")))?;
    if !user.can_modify(&course.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to delete this course",
            user.0.id
        )));
    }

    context.course_store.delete_course(&id)?;
    context.refresh_average_cost(&course.bootcamp_id)?;
    Ok(HttpResponse::Ok().json(json!({"success": true, "data": {}})))
}

pub fn courses_routes() -> Scope {
    web::scope("/courses")
        .route("", get().to(get_courses))
        .route("", post().to(create_course))
        .route("/{id}", get().to(get_course))
        .route("/{id}", put().to(update_course))
        .route("/{id}", delete().to(delete_course))
}
