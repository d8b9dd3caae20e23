use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    errors::ApiError,
    handlers::{PageParams, PageResponse},
    lifecycle::resolve_renewal,
    models::{AuthUser, Category, Currency, Frequency, Subscription, SubscriptionStatus},
    utils::validate::validate_subscription,
    AppState,
};

#[get("")]
pub async fn get_subscriptions(
    app_state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let (current_page, per_page, offset) = params.window();

    let total_records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions")
        .fetch_one(&app_state.db)
        .await?;

    let records: Vec<Subscription> = sqlx::query_as(
        r#"
        SELECT id, name, price, currency, frequency, category, payment_method,
               status, start_date, renewal_date, user_id, created_at, updated_at
        FROM subscriptions
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

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
    pub days: Option<i64>,
}

#[get("/upcoming-renewals")]
pub async fn upcoming_renewals(
    app_state: web::Data<AppState>,
    params: web::Query<UpcomingParams>,
    auth_user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    let days = params.days.unwrap_or(7).clamp(1, 365);
    let now = Utc::now();
    let until = now + Duration::days(days);

    let records: Vec<Subscription> = sqlx::query_as(
        r#"
        SELECT id, name, price, currency, frequency, category, payment_method,
               status, start_date, renewal_date, user_id, created_at, updated_at
        FROM subscriptions
        WHERE user_id = $1
          AND status = $2
          AND renewal_date BETWEEN $3 AND $4
        ORDER BY renewal_date ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(SubscriptionStatus::Active)
    .bind(now)
    .bind(until)
    .fetch_all(&app_state.db)
    .await?;

    Ok(HttpResponse::Ok().json(records))
}

#[get("/user/{userId}")]
pub async fn get_user_subscriptions(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth_user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if user_id != auth_user.id {
        return Err(ApiError::Forbidden(
            "you may only list your own subscriptions",
        ));
    }

    let records: Vec<Subscription> = sqlx::query_as(
        r#"
        SELECT id, name, price, currency, frequency, category, payment_method,
               status, start_date, renewal_date, user_id, created_at, updated_at
        FROM subscriptions
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&app_state.db)
    .await?;

    Ok(HttpResponse::Ok().json(records))
}

#[get("/{id}")]
pub async fn get_subscription(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let subscription: Option<Subscription> = sqlx::query_as(
        r#"
        SELECT id, name, price, currency, frequency, category, payment_method,
               status, start_date, renewal_date, user_id, created_at, updated_at
        FROM subscriptions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&app_state.db)
    .await?;

    match subscription {
        Some(subscription) => Ok(HttpResponse::Ok().json(subscription)),
        None => Err(ApiError::NotFound("subscription")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub currency: Currency,
    pub frequency: Option<Frequency>,
    pub category: Category,
    pub payment_method: String,
    pub start_date: DateTime<Utc>,
    pub renewal_date: Option<DateTime<Utc>>,
}

#[post("")]
pub async fn create_subscription(
    app_state: web::Data<AppState>,
    body: web::Json<CreateSubscriptionRequest>,
    auth_user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();

    let violations = validate_subscription(&req.name, req.price, &req.payment_method);
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let resolved = resolve_renewal(
        req.start_date,
        req.frequency,
        req.renewal_date,
        SubscriptionStatus::default(),
        Utc::now(),
    )?;

    let subscription: Subscription = sqlx::query_as(
        r#"
        INSERT INTO subscriptions
            (name, price, currency, frequency, category, payment_method,
             status, start_date, renewal_date, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, name, price, currency, frequency, category, payment_method,
                  status, start_date, renewal_date, user_id, created_at, updated_at
        "#,
    )
    .bind(req.name.trim())
    .bind(req.price)
    .bind(req.currency)
    .bind(req.frequency)
    .bind(req.category)
    .bind(req.payment_method.trim())
    .bind(resolved.status)
    .bind(req.start_date)
    .bind(resolved.renewal_date)
    .bind(auth_user.id)
    .fetch_one(&app_state.db)
    .await?;

    Ok(HttpResponse::Created().json(subscription))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<Currency>,
    pub frequency: Option<Frequency>,
    pub category: Option<Category>,
    pub payment_method: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub renewal_date: Option<DateTime<Utc>>,
}

#[put("/{id}")]
pub async fn update_subscription(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth_user: web::ReqData<AuthUser>,
    body: web::Json<UpdateSubscriptionRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let req = body.into_inner();

    let existing: Option<Subscription> = sqlx::query_as(
        r#"
        SELECT id, name, price, currency, frequency, category, payment_method,
               status, start_date, renewal_date, user_id, created_at, updated_at
        FROM subscriptions
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(auth_user.id)
    .fetch_optional(&app_state.db)
    .await?;
    let existing = existing.ok_or(ApiError::NotFound("subscription"))?;

    let name = req
        .name
        .as_deref()
        .unwrap_or(&existing.name)
        .trim()
        .to_string();
    let price = req.price.unwrap_or(existing.price);
    let currency = req.currency.unwrap_or(existing.currency);
    let frequency = req.frequency.or(existing.frequency);
    let category = req.category.unwrap_or(existing.category);
    let payment_method = req
        .payment_method
        .as_deref()
        .unwrap_or(&existing.payment_method)
        .trim()
        .to_string();
    let start_date = req.start_date.unwrap_or(existing.start_date);

    let violations = validate_subscription(&name, price, &payment_method);
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    // The stored renewal date only counts as explicit when none of the
    // date-bearing fields changed; otherwise it is re-derived.
    let dates_touched =
        req.start_date.is_some() || req.frequency.is_some() || req.renewal_date.is_some();
    let explicit_renewal_date = if req.renewal_date.is_some() {
        req.renewal_date
    } else if dates_touched {
        None
    } else {
        Some(existing.renewal_date)
    };

    let resolved = resolve_renewal(
        start_date,
        frequency,
        explicit_renewal_date,
        existing.status,
        Utc::now(),
    )?;

    let subscription: Subscription = sqlx::query_as(
        r#"
        UPDATE subscriptions
        SET name = $1, price = $2, currency = $3, frequency = $4, category = $5,
            payment_method = $6, status = $7, start_date = $8, renewal_date = $9,
            updated_at = NOW()
        WHERE id = $10 AND user_id = $11
        RETURNING id, name, price, currency, frequency, category, payment_method,
                  status, start_date, renewal_date, user_id, created_at, updated_at
        "#,
    )
    .bind(&name)
    .bind(price)
    .bind(currency)
    .bind(frequency)
    .bind(category)
    .bind(&payment_method)
    .bind(resolved.status)
    .bind(start_date)
    .bind(resolved.renewal_date)
    .bind(id)
    .bind(auth_user.id)
    .fetch_one(&app_state.db)
    .await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[put("/{id}/cancel")]
pub async fn cancel_subscription(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth_user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let subscription: Option<Subscription> = sqlx::query_as(
        r#"
        UPDATE subscriptions
        SET status = $1, updated_at = NOW()
        WHERE id = $2 AND user_id = $3
        RETURNING id, name, price, currency, frequency, category, payment_method,
                  status, start_date, renewal_date, user_id, created_at, updated_at
        "#,
    )
    .bind(SubscriptionStatus::Cancelled)
    .bind(id)
    .bind(auth_user.id)
    .fetch_optional(&app_state.db)
    .await?;

    match subscription {
        Some(subscription) => Ok(HttpResponse::Ok().json(subscription)),
        None => Err(ApiError::NotFound("subscription")),
    }
}

#[delete("/{id}")]
pub async fn delete_subscription(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth_user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let deleted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        DELETE FROM subscriptions
        WHERE id = $1 AND user_id = $2
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(auth_user.id)
    .fetch_optional(&app_state.db)
    .await?;

    match deleted {
        Some(_) => Ok(HttpResponse::Ok().finish()),
        None => Err(ApiError::NotFound("subscription")),
    }
}
