use crate::api::server::AppState;
use crate::error::ServerError;
use actix_web::{
    web::{self, delete, get, post, put, Data, Json, Path},
    HttpResponse, Scope,
};
use serde_json::json;
use shared::models::api::{ApiListResponse, ApiResponse};
use shared::models::review::{rating_in_range, Review, ReviewRequest, ReviewUpdate, MAX_RATING, MIN_RATING};
use shared::security::authenticate::CurrentUser;

fn validate_rating(rating: u8) -> Result<(), ServerError> {
    if !rating_in_range(rating) {
        return Err(ServerError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

async fn get_reviews(app_state: Data<AppState>) -> Result<HttpResponse, ServerError> {
    let reviews = app_state.store_context.review_store.get_reviews()?;
    Ok(ApiListResponse::ok(reviews).into())
}

async fn get_review(
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let review = app_state
        .store_context
        .review_store
        .get_review(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Review not found with id {id}")))?;
    Ok(ApiResponse::ok(review).into())
}

async fn create_review(
    user: CurrentUser,
    request: Json<ReviewRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let request = request.into_inner();
    if request.title.trim().is_empty() || request.text.trim().is_empty() {
        return Err(ServerError::Validation(
            "Please add a title and some text".to_string(),
        ));
    }
    validate_rating(request.rating)?;

    let context = &app_state.store_context;
    if context
        .bootcamp_store
        .get_bootcamp(&request.bootcamp_id)?
        .is_none()
    {
        return Err(ServerError::NotFound(format!(
            "Bootcamp not found with id {}",
            request.bootcamp_id
        )));
    }
    if context
        .review_store
        .get_review_by_user_and_bootcamp(&user.0.id, &request.bootcamp_id)?
        .is_some()
    {
        return Err(ServerError::Validation(
            "You have already reviewed this bootcamp".to_string(),
        ));
    }

    let review = Review::new(request, &user.0.id);
    context.review_store.add_review(&review)?;
    context.refresh_average_rating(&review.bootcamp_id)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(review)))
}

async fn update_review(
    user: CurrentUser,
    id: Path<String>,
    update: Json<ReviewUpdate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let context = &app_state.store_context;
    let mut review = context
        .review_store
        .get_review(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Review not found with id {id}")))?;
    if !user.can_modify(&review.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to update this review",
            user.0.id
        )));
    }

    let update = update.into_inner();
    if let Some(rating) = update.rating {
        validate_rating(rating)?;
    }
    review.apply(update);
    context.review_store.update_review(&review)?;
    context.refresh_average_rating(&review.bootcamp_id)?;
    Ok(ApiResponse::ok(review).into())
}

async fn delete_review(
    user: CurrentUser,
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let context = &app_state.store_context;
    let review = context
        .review_store
        .get_review(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("Review not found with id {id}")))?;
    if !user.can_modify(&review.user_id) {
        return Err(ServerError::Forbidden(format!(
            "User {} is not authorized to delete this review",
            user.0.id
        )));
    }

    context.review_store.delete_review(&id)?;
    context.refresh_average_rating(&review.bootcamp_id)?;
    Ok(HttpResponse::Ok().json(json!({"success": true, "data": {}})))
}

pub fn reviews_routes() -> Scope {
    web::scope("/reviews")
        .route("", get().to(get_reviews))
        .route("", post().to(create_review))
        .route("/{id}", get().to(get_review))
        .route("/{id}", put().to(update_review))
        .route("/{id}", delete().to(delete_review))
}
