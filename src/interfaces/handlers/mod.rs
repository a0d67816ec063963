pub mod auth;
pub mod blog_posts;
pub mod home;
pub mod json_error;
pub mod resources;
pub mod skills;
pub mod system;
