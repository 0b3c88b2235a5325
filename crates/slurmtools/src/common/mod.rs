pub mod cli;
pub mod command;
pub mod error;
pub mod manager;
pub mod setup;
pub mod utils;
