pub mod aggregate;
pub mod config;
pub mod freshness;
pub mod models;
