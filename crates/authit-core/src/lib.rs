pub mod config;
pub mod error;
pub mod lead;
pub mod payload;
pub mod store;
pub mod visit;
