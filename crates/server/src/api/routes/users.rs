use crate::api::routes::{validate_email, validate_password};
use crate::api::server::AppState;
use crate::error::ServerError;
use actix_web::{
    web::{self, delete, get, post, put, Data, Json, Path},
    HttpResponse, Scope,
};
use serde_json::json;
use shared::models::api::{ApiListResponse, ApiResponse};
use shared::models::user::{RegisterRequest, Role, User, UserUpdate};
use shared::security::authenticate::CurrentUser;

async fn get_users(
    user: CurrentUser,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    user.require_role(&[Role::Admin])?;
    let users: Vec<_> = app_state
        .store_context
        .user_store
        .get_users()?
        .iter()
        .map(User::public)
        .collect();
    Ok(ApiListResponse::ok(users).into())
}

async fn get_user(
    user: CurrentUser,
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    user.require_role(&[Role::Admin])?;
    let found = app_state
        .store_context
        .user_store
        .get_user(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("User not found with id {id}")))?;
    Ok(ApiResponse::ok(found.public()).into())
}

async fn create_user(
    user: CurrentUser,
    request: Json<RegisterRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    user.require_role(&[Role::Admin])?;
    let request = request.into_inner();
    if request.name.trim().is_empty() {
        return Err(ServerError::Validation("Please add a name".to_string()));
    }
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let store = &app_state.store_context.user_store;
    if store.get_user_by_email(&request.email)?.is_some() {
        return Err(ServerError::Validation(
            "Email is already registered".to_string(),
        ));
    }

    // Admins may create users with any role, including other admins.
    let created = User::new(&request.name, &request.email, &request.password, request.role);
    store.add_user(&created)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(created.public())))
}

async fn update_user(
    user: CurrentUser,
    id: Path<String>,
    update: Json<UserUpdate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    user.require_role(&[Role::Admin])?;
    let store = &app_state.store_context.user_store;
    let mut target = store
        .get_user(&id)?
        .ok_or_else(|| ServerError::NotFound(format!("User not found with id {id}")))?;

    let update = update.into_inner();
    if let Some(email) = update.email {
        validate_email(&email)?;
        if let Some(existing) = store.get_user_by_email(&email)? {
            if existing.id != target.id {
                return Err(ServerError::Validation(
                    "Email is already registered".to_string(),
                ));
            }
        }
        target.email = email;
    }
    if let Some(name) = update.name {
        target.name = name;
    }
    if let Some(role) = update.role {
        target.role = role;
    }

    store.update_user(&target)?;
    Ok(ApiResponse::ok(target.public()).into())
}

async fn delete_user(
    user: CurrentUser,
    id: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    user.require_role(&[Role::Admin])?;
    let store = &app_state.store_context.user_store;
    if store.get_user(&id)?.is_none() {
        return Err(ServerError::NotFound(format!("User not found with id {id}")));
    }
    store.delete_user(&id)?;
    Ok(HttpResponse::Ok().json(json!({"success": true, "data": {}})))
}

pub fn users_routes() -> Scope {
    web::scope("/users")
        .route("", get().to(get_users))
        .route("", post().to(create_user))
        .route("/{id}", get().to(get_user))
        .route("/{id}", put().to(update_user))
        .route("/{id}", delete().to(delete_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::server::build_auth_state;
    use crate::api::tests::helper::{create_test_app_state, create_test_user};
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use shared::security::authenticate::Authenticate;

    #[actix_web::test]
    async fn test_non_admin_is_forbidden() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(users_routes()),
        )
        .await;
        let (_, token) = create_test_user(&app_state, "Pub", "pub@gmail.com", Role::Publisher);

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get().uri("/users").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_admin_crud() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(users_routes()),
        )
        .await;
        let (_, token) = create_test_user(&app_state, "Admin", "admin@gmail.com", Role::Admin);

        let req = test::TestRequest::post()
            .uri("/users")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({
                "name": "John Doe",
                "email": "john@gmail.com",
                "password": "123456",
                "role": "publisher"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let id = json["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"role": "admin"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["role"], "admin");

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["count"], 2);

        let req = test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert!(app_state
            .store_context
            .user_store
            .get_user(&id)
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn test_admin_create_and_update_are_validated() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(users_routes()),
        )
        .await;
        let (admin, token) = create_test_user(&app_state, "Admin", "admin@gmail.com", Role::Admin);

        let req = test::TestRequest::post()
            .uri("/users")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({
                "name": "Weak",
                "email": "weak@gmail.com",
                "password": "123"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::post()
            .uri("/users")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({
                "name": "Bad Email",
                "email": "not-an-email",
                "password": "123456"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::put()
            .uri(&format!("/users/{}", admin.id))
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"email": "not-an-email"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn test_get_missing_user_is_not_found() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(users_routes()),
        )
        .await;
        let (_, token) = create_test_user(&app_state, "Admin", "admin@gmail.com", Role::Admin);

        let req = test::TestRequest::get()
            .uri("/users/missing")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
