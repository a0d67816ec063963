pub mod auth;
pub mod blog;
pub mod extractors;
pub mod gate;
pub mod resource;
pub mod skill;
