use actix_cors::Cors;
use actix_web::{
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use sqlx::PgPool;

use crate::config::Config;
use crate::middleware::jwt_middleware::JwtAuth;

mod config;
mod db;
mod errors;
mod handlers;
mod lifecycle;
mod middleware;
mod models;
mod routes;
mod utils;

pub struct AppState {
    db: PgPool,
    jwt_secret: String,
    jwt_ttl_minutes: i64,
}

async fn welcome() -> HttpResponse {
    HttpResponse::Ok().body("Welcome to the Subscription Tracker API")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::from_filename(".env")
        .or_else(|_| dotenv::dotenv())
        .ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let pool = match db::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("error connecting to database: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = db::run_migrations(&pool).await {
        log::error!("error running migrations: {err}");
        std::process::exit(1);
    }
    log::info!("connected to database in {} mode", config.environment);

    let app_data = Data::new(AppState {
        db: pool.clone(),
        jwt_secret: config.jwt_secret.clone(),
        jwt_ttl_minutes: config.jwt_ttl_minutes,
    });
    let jwt_auth = JwtAuth::new(app_data.clone());

    log::info!(
        "subscription tracker API running on http://{}:{}",
        config.host,
        config.port
    );

    let result = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(app_data.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .route("/", web::get().to(welcome))
            .service(
                web::scope("/api")
                    .configure(routes::auth_routes::config)
                    .configure(|cfg| routes::user_routes::config(cfg, jwt_auth.clone()))
                    .configure(|cfg| routes::subscription_routes::config(cfg, jwt_auth.clone())),
            )
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await;

    pool.close().await;
    result
}
