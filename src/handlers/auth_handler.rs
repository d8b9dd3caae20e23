use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    errors::ApiError,
    models::{Claims, PublicUser, User},
    utils::validate::validate_user,
    AppState,
};

pub(crate) const BCRYPT_COST: u32 = 12;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[post("/sign-up")]
pub async fn sign_up(
    app_state: web::Data<AppState>,
    body: web::Json<SignUpRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();

    let violations = validate_user(&req.name, &req.email, Some(&req.password));
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let email = req.email.trim().to_lowercase();
    let password_hash = hash(&req.password, BCRYPT_COST)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (name, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(req.name.trim())
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&app_state.db)
    .await
    .map_err(map_unique_email)?;

    let token = issue_access_token(user.id, &app_state.jwt_secret, app_state.jwt_ttl_minutes)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "token": token,
        "user": PublicUser::from(user),
    })))
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[post("/sign-in")]
pub async fn sign_in(
    app_state: web::Data<AppState>,
    body: web::Json<SignInRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as(
        r#"
        SELECT id, name, email, password_hash, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(&app_state.db)
    .await?;

    let user = user.ok_or(ApiError::InvalidCredentials)?;

    match verify(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return Err(ApiError::InvalidCredentials),
        Err(err) => return Err(ApiError::Hash(err)),
    }

    let token = issue_access_token(user.id, &app_state.jwt_secret, app_state.jwt_ttl_minutes)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "user": PublicUser::from(user),
    })))
}

pub(crate) fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(ttl_minutes)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub(crate) fn map_unique_email(err: sqlx::Error) -> ApiError {
    match err {
        sqlx::Error::Database(db) if db.message().contains("users_email_key") => {
            ApiError::Conflict("email already registered")
        }
        other => ApiError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[test]
    fn issued_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, "secret", 15).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, user_id);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn token_is_rejected_with_the_wrong_secret() {
        let token = issue_access_token(Uuid::new_v4(), "secret", 15).unwrap();
        assert!(decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other"),
            &Validation::default(),
        )
        .is_err());
    }
}
