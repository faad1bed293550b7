pub mod cors;
pub mod models;
