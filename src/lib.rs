pub mod commands;
pub mod config;
pub mod context;
pub mod feed;
pub mod models;
pub mod orchestrator;
pub mod queue;
