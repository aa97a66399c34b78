pub mod cli;
pub mod command_handlers;
pub mod config;
pub mod errors;
pub mod logging;
pub mod optimize_client;
pub mod repo;
pub mod runner;
