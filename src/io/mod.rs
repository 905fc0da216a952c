pub mod output;
pub mod repo;
pub mod walker;
