use actix_web::web;

use crate::{
    entities::{
        about::About, education::Education, experience::WorkExperience, profile::Profile,
        project::Project, resource::Resource,
    },
    handlers::{resources, skills},
};

fn item_routes<R: Resource>() -> actix_web::Resource {
    web::resource("/{id}")
        .route(web::get().to(resources::get_by_id::<R>))
        .route(web::patch().to(resources::update::<R>))
        .route(web::delete().to(resources::delete::<R>))
}

fn crud_scope<R: Resource>(path: &str) -> actix_web::Scope {
    web::scope(path)
        .service(
            web::resource("")
                .route(web::get().to(resources::get_all::<R>))
                .route(web::post().to(resources::create::<R>))
        )
        .service(item_routes::<R>())
}

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crud_scope::<Profile>("/profile"))
        .service(crud_scope::<WorkExperience>("/experience"))
        .service(crud_scope::<Education>("/education"))
        .service(crud_scope::<About>("/about"))
        .service(
            web::scope("/projects")
                .service(
                    web::resource("")
                        .route(web::get().to(resources::get_projects))
                        .route(web::post().to(resources::create::<Project>))
                )
                .service(item_routes::<Project>())
        )
        .service(
            web::resource("/skills")
                .route(web::get().to(skills::get_skills))
                .route(web::put().to(skills::update_skills))
        );
}
