//! # pb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.
//! Handlers map one route onto one repository operation.

use actix_web::{web, HttpResponse, Responder};
use pb_core::error::AppError;
use pb_core::models::{NewPost, NewUser, PostPatch};
use pb_core::traits::{AuthProvider, PostRepo, UserRepo};
use std::sync::Arc;

use crate::dto::{
    CreatedResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserSummary,
};
use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub posts: Arc<dyn PostRepo>,
    pub auth: Arc<dyn AuthProvider>,
}

type ApiResult = Result<HttpResponse, ApiError>;

/// Liveness check for "/"
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new("API is running!"))
}

// ========== Users ==========

pub async fn list_users(data: web::Data<AppState>) -> ApiResult {
    let users: Vec<UserSummary> = data
        .users
        .list_users()
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// Hashes the password off the async worker, then inserts.
/// A taken username surfaces as a conflict from the storage constraint.
pub async fn register(data: web::Data<AppState>, body: web::Json<RegisterRequest>) -> ApiResult {
    let RegisterRequest { username, password, role_id } = body.into_inner();

    let auth = Arc::clone(&data.auth);
    let password_hash = web::block(move || auth.hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))??;

    let user = data
        .users
        .create_user(NewUser { username, password_hash, role_id })
        .await?;

    log::info!("registered user {} ({})", user.id, user.username);
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Registration successful".to_string(),
        id: user.id,
    }))
}

/// Checks credentials and echoes the identity. No session or token is issued.
pub async fn login(data: web::Data<AppState>, body: web::Json<LoginRequest>) -> ApiResult {
    let LoginRequest { username, password } = body.into_inner();

    let Some(user) = data.users.find_user_by_username(&username).await? else {
        return Err(AppError::Unauthorized("invalid username or password".to_string()).into());
    };

    let auth = Arc::clone(&data.auth);
    let stored = user.password_hash.clone();
    let verified = web::block(move || auth.verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?;

    if !verified {
        log::warn!("failed login for user {}", user.id);
        return Err(AppError::Unauthorized("invalid username or password".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        id: user.id,
        username: user.username,
    }))
}

// ========== Posts ==========

pub async fn list_posts(data: web::Data<AppState>) -> ApiResult {
    let posts = data.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn get_post(data: web::Data<AppState>, path: web::Path<i64>) -> ApiResult {
    let id = path.into_inner();
    let post = data
        .posts
        .get_post(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn create_post(data: web::Data<AppState>, body: web::Json<NewPost>) -> ApiResult {
    let post = data.posts.create_post(body.into_inner()).await?;
    log::debug!("created post {} for user {}", post.id, post.user_id);
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Post created".to_string(),
        id: post.id,
    }))
}

/// A missing post is a 404 whatever the body holds, so the body is only
/// inspected once the post is known to exist.
pub async fn update_post(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: Result<web::Json<PostPatch>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    if data.posts.get_post(id).await.map_err(ApiError)?.is_none() {
        return Err(ApiError(AppError::not_found("Post", id)).into());
    }

    let patch = body?.into_inner();
    data.posts
        .update_post(id, patch)
        .await
        .map_err(ApiError)?
        .ok_or_else(|| ApiError(AppError::not_found("Post", id)))?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post updated")))
}

pub async fn delete_post(data: web::Data<AppState>, path: web::Path<i64>) -> ApiResult {
    let id = path.into_inner();
    if !data.posts.delete_post(id).await? {
        return Err(AppError::not_found("Post", id).into());
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}
