pub mod document_store;
pub mod memory_store;
pub mod mongo_store;
pub mod session_store;
