pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
