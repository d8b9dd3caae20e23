use actix_web::web;

use crate::{handlers::subscription_handler, middleware::jwt_middleware::JwtAuth};

pub fn config(config: &mut web::ServiceConfig, jwt_auth: JwtAuth) {
    // Literal segments are registered ahead of the `{id}` matchers.
    config.service(
        web::scope("/v1/subscriptions")
            .service(subscription_handler::upcoming_renewals)
            .service(subscription_handler::get_user_subscriptions)
            .service(subscription_handler::get_subscriptions)
            .service(subscription_handler::create_subscription)
            .service(subscription_handler::cancel_subscription)
            .service(subscription_handler::get_subscription)
            .service(subscription_handler::update_subscription)
            .service(subscription_handler::delete_subscription)
            .wrap(jwt_auth),
    );
}
