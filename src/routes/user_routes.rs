use actix_web::web;

use crate::{handlers::user_handler, middleware::jwt_middleware::JwtAuth};

pub fn config(config: &mut web::ServiceConfig, jwt_auth: JwtAuth) {
    config.service(
        web::scope("/v1/users")
            .service(user_handler::get_users)
            .service(user_handler::get_user)
            .service(user_handler::create_user)
            .service(user_handler::update_user)
            .service(user_handler::delete_user)
            .wrap(jwt_auth),
    );
}
