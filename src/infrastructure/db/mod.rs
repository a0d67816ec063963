pub mod mongo;
pub mod redis;
