use crate::api::routes::{validate_email, validate_password};
use crate::api::server::AppState;
use crate::error::ServerError;
use crate::store::domains::session_store::Session;
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    http::StatusCode,
    web::{self, get, post, put, Data, Json},
    HttpRequest, HttpResponse, Scope,
};
use serde_json::json;
use shared::models::api::ApiResponse;
use shared::models::user::{
    LoginRequest, RegisterRequest, Role, UpdateDetailsRequest, UpdatePasswordRequest, User,
};
use shared::security::authenticate::{extract_token, CurrentUser, TOKEN_COOKIE};

/// Issues a fresh session and returns the token in both the body and an
/// http-only cookie, so browser and API clients work the same way.
fn send_token_response(
    app_state: &Data<AppState>,
    user: &User,
    status: StatusCode,
) -> Result<HttpResponse, ServerError> {
    let ttl = app_state.config.token_expire_secs;
    let session = Session::new(&user.id, ttl);
    app_state.store_context.session_store.put_session(&session)?;

    let cookie = Cookie::build(TOKEN_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(ttl))
        .finish();

    Ok(HttpResponse::build(status).cookie(cookie).json(json!({
        "success": true,
        "token": session.token
    })))
}

async fn register(
    request: Json<RegisterRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let request = request.into_inner();
    if request.name.trim().is_empty() {
        return Err(ServerError::Validation("Please add a name".to_string()));
    }
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    if request.role == Role::Admin {
        return Err(ServerError::Validation(
            "Cannot register as admin".to_string(),
        ));
    }

    let store = &app_state.store_context.user_store;
    if store.get_user_by_email(&request.email)?.is_some() {
        return Err(ServerError::Validation(
            "Email is already registered".to_string(),
        ));
    }

    let user = User::new(&request.name, &request.email, &request.password, request.role);
    store.add_user(&user)?;
    send_token_response(&app_state, &user, StatusCode::CREATED)
}

async fn login(
    request: Json<LoginRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let user = app_state
        .store_context
        .user_store
        .get_user_by_email(&request.email)?
        .ok_or_else(|| ServerError::Unauthorized("Invalid credentials".to_string()))?;
    if !user.password.verify(&request.password) {
        return Err(ServerError::Unauthorized("Invalid credentials".to_string()));
    }
    send_token_response(&app_state, &user, StatusCode::OK)
}

async fn logout(req: HttpRequest, app_state: Data<AppState>) -> Result<HttpResponse, ServerError> {
    if let Some(token) = extract_token(&req) {
        app_state.store_context.session_store.delete_session(&token)?;
    }

    let cookie = Cookie::build(TOKEN_COOKIE, "none")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(1))
        .finish();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({"success": true, "data": {}})))
}

async fn me(user: CurrentUser, app_state: Data<AppState>) -> Result<HttpResponse, ServerError> {
    let user = app_state
        .store_context
        .user_store
        .get_user(&user.0.id)?
        .ok_or_else(|| ServerError::NotFound("User no longer exists".to_string()))?;
    Ok(ApiResponse::ok(user.public()).into())
}

async fn update_details(
    current: CurrentUser,
    request: Json<UpdateDetailsRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = &app_state.store_context.user_store;
    let mut user = store
        .get_user(&current.0.id)?
        .ok_or_else(|| ServerError::NotFound("User no longer exists".to_string()))?;

    let request = request.into_inner();
    if let Some(email) = request.email {
        validate_email(&email)?;
        if let Some(existing) = store.get_user_by_email(&email)? {
            if existing.id != user.id {
                return Err(ServerError::Validation(
                    "Email is already registered".to_string(),
                ));
            }
        }
        user.email = email;
    }
    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ServerError::Validation("Please add a name".to_string()));
        }
        user.name = name;
    }

    store.update_user(&user)?;
    Ok(ApiResponse::ok(user.public()).into())
}

async fn update_password(
    current: CurrentUser,
    req: HttpRequest,
    request: Json<UpdatePasswordRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = &app_state.store_context.user_store;
    let mut user = store
        .get_user(&current.0.id)?
        .ok_or_else(|| ServerError::NotFound("User no longer exists".to_string()))?;

    if !user.password.verify(&request.current_password) {
        return Err(ServerError::Unauthorized("Password is incorrect".to_string()));
    }
    validate_password(&request.new_password)?;

    user.password = shared::models::user::PasswordDigest::new(&request.new_password);
    store.update_user(&user)?;

    // Rotate the session: the old token stops working immediately.
    if let Some(token) = extract_token(&req) {
        app_state.store_context.session_store.delete_session(&token)?;
    }
    send_token_response(&app_state, &user, StatusCode::OK)
}

pub fn auth_routes() -> Scope {
    web::scope("/auth")
        .route("/register", post().to(register))
        .route("/login", post().to(login))
        .route("/logout", get().to(logout))
        .route("/me", get().to(me))
        .route("/updatedetails", put().to(update_details))
        .route("/updatepassword", put().to(update_password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::server::build_auth_state;
    use crate::api::tests::helper::{create_test_app_state, create_test_user};
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{test, App};
    use shared::security::authenticate::Authenticate;

    #[actix_web::test]
    async fn test_register_then_me() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(auth_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
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
        let token = json["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["email"], "john@gmail.com");
        assert_eq!(json["data"]["role"], "publisher");
        assert!(json["data"].get("password").is_none());
    }

    #[actix_web::test]
    async fn test_register_rejects_admin_and_duplicates() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(auth_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "name": "Mallory",
                "email": "mallory@gmail.com",
                "password": "123456",
                "role": "admin"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        create_test_user(&app_state, "John", "john@gmail.com", Role::User);
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "name": "John Again",
                "email": "john@gmail.com",
                "password": "123456"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(auth_routes()),
        )
        .await;
        create_test_user(&app_state, "John", "john@gmail.com", Role::User);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "john@gmail.com", "password": "wrong"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "nobody@gmail.com", "password": "123456"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_login_sets_cookie() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(auth_routes()),
        )
        .await;
        create_test_user(&app_state, "John", "john@gmail.com", Role::User);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "john@gmail.com", "password": "123456"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == TOKEN_COOKIE)
            .unwrap();
        assert!(!cookie.value().is_empty());
    }

    #[actix_web::test]
    async fn test_logout_invalidates_token() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(auth_routes()),
        )
        .await;
        let (_, token) = create_test_user(&app_state, "John", "john@gmail.com", Role::User);

        let req = test::TestRequest::get()
            .uri("/auth/logout")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_update_password_rotates_token() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(auth_routes()),
        )
        .await;
        let (_, token) = create_test_user(&app_state, "John", "john@gmail.com", Role::User);

        let req = test::TestRequest::put()
            .uri("/auth/updatepassword")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"current_password": "123456", "new_password": "654321"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let new_token = json["token"].as_str().unwrap().to_string();
        assert_ne!(new_token, token);

        // Old token is dead, new token works.
        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header((AUTHORIZATION, format!("Bearer {new_token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_update_details_rejects_taken_email() {
        let app_state = create_test_app_state().await;
        let auth_state = build_auth_state(app_state.store_context.clone());
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .wrap(Authenticate::new(auth_state))
                .service(auth_routes()),
        )
        .await;
        create_test_user(&app_state, "Jane", "jane@gmail.com", Role::User);
        let (_, token) = create_test_user(&app_state, "John", "john@gmail.com", Role::User);

        let req = test::TestRequest::put()
            .uri("/auth/updatedetails")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"email": "jane@gmail.com"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::put()
            .uri("/auth/updatedetails")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"name": "John Smith"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["name"], "John Smith");
    }
}
