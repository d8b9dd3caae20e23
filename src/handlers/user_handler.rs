use actix_web::{delete, get, post, put, web, HttpResponse};
use bcrypt::hash;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    errors::ApiError,
    handlers::auth_handler::{map_unique_email, BCRYPT_COST},
    handlers::{PageParams, PageResponse},
    models::{AuthUser, PublicUser, User},
    utils::validate::validate_user,
    AppState,
};

#[get("")]
pub async fn get_users(
    app_state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let (current_page, per_page, offset) = params.window();

    let total_records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&app_state.db)
        .await?;

    let records: Vec<PublicUser> = sqlx::query_as(
        r#"
        SELECT id, name, email, created_at, updated_at
        FROM users
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(&app_state.db)
    .await?;

    Ok(HttpResponse::Ok().json(PageResponse::new(
        total_records,
        current_page,
        per_page,
        records,
    )))
}

#[get("/{userId}")]
pub async fn get_user(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let user: Option<PublicUser> = sqlx::query_as(
        r#"
        SELECT id, name, email, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&app_state.db)
    .await?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(ApiError::NotFound("user")),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[post("")]
pub async fn create_user(
    app_state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();

    let violations = validate_user(&req.name, &req.email, Some(&req.password));
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let password_hash = hash(&req.password, BCRYPT_COST)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (name, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(req.name.trim())
    .bind(req.email.trim().to_lowercase())
    .bind(&password_hash)
    .fetch_one(&app_state.db)
    .await
    .map_err(map_unique_email)?;

    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[put("/{userId}")]
pub async fn update_user(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth_user: web::ReqData<AuthUser>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if user_id != auth_user.id {
        return Err(ApiError::Forbidden("you may only update your own account"));
    }
    let req = body.into_inner();

    let current: Option<User> = sqlx::query_as(
        r#"
        SELECT id, name, email, password_hash, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&app_state.db)
    .await?;
    let current = current.ok_or(ApiError::NotFound("user"))?;

    let name = req.name.as_deref().unwrap_or(&current.name).trim().to_string();
    let email = req
        .email
        .as_deref()
        .unwrap_or(&current.email)
        .trim()
        .to_lowercase();

    let violations = validate_user(&name, &email, req.password.as_deref());
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let password_hash = match &req.password {
        Some(password) => hash(password, BCRYPT_COST)?,
        None => current.password_hash.clone(),
    };

    let updated: User = sqlx::query_as(
        r#"
        UPDATE users
        SET name = $1, email = $2, password_hash = $3, updated_at = NOW()
        WHERE id = $4
        RETURNING id, name, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(user_id)
    .fetch_one(&app_state.db)
    .await
    .map_err(map_unique_email)?;

    Ok(HttpResponse::Ok().json(PublicUser::from(updated)))
}

#[delete("/{userId}")]
pub async fn delete_user(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth_user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if user_id != auth_user.id {
        return Err(ApiError::Forbidden("you may only delete your own account"));
    }

    let deleted: Option<(Uuid,)> = sqlx::query_as("DELETE FROM users WHERE id = $1 RETURNING id")
        .bind(user_id)
        .fetch_optional(&app_state.db)
        .await?;

    match deleted {
        Some(_) => Ok(HttpResponse::Ok().finish()),
        None => Err(ApiError::NotFound("user")),
    }
}
