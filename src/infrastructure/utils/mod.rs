pub mod get_client_ip;
pub mod markdown;
pub mod timestamp;
pub mod valid_id;
