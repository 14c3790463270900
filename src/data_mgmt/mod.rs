pub mod models;
pub mod summary;
