pub mod cli;
pub mod configuration;
pub mod errors;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod startup;
pub mod store;
pub mod telemetry;
