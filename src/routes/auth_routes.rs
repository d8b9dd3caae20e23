use actix_web::web;

use crate::handlers::auth_handler;

pub fn config(config: &mut web::ServiceConfig) {
    config.service(
        web::scope("/v1/auth")
            .service(auth_handler::sign_up)
            .service(auth_handler::sign_in),
    );
}
