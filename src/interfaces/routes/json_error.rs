use actix_web::web;

use crate::{
    constants::MAX_BODY_BYTES,
    handlers::json_error::{query_error_handler, route_not_found},
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .default_service(web::to(route_not_found));
}
