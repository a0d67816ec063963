pub mod about;
pub mod blog_post;
pub mod education;
pub mod experience;
pub mod identity;
pub mod option_fields;
pub mod profile;
pub mod project;
pub mod resource;
pub mod skill;
pub mod token;
pub mod user;
pub mod validators;
