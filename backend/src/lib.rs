pub mod config;
pub mod error;
pub mod inference;
pub mod report;
pub mod routes;
