pub mod config;
pub mod coverage;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod traits;
