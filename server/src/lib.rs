pub mod config;
pub mod handlers;
pub mod models;
pub mod queue;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;
