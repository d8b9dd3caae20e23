pub mod auth_routes;
pub mod subscription_routes;
pub mod user_routes;
