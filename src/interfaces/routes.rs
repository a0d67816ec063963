use actix_web::{http::StatusCode, middleware::ErrorHandlers, web};

use crate::handlers::{home::home, json_error::bare_error_to_envelope, system::health_check};

mod auth;
mod blog;
mod json_error;
mod resources;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, bare_error_to_envelope)
                    .handler(StatusCode::METHOD_NOT_ALLOWED, bare_error_to_envelope),
            )
            .service(health_check)
            .configure(auth::config_routes)
            .configure(blog::config_routes)
            .configure(resources::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
