pub mod actions;
pub mod handlers;
pub mod repositories;
pub mod routes;
