//! gs-cli library
//!
//! Command-line definitions and the HTTP client for the supervisor's
//! control API.

pub mod cli;
pub mod client;
pub mod commands;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use client::{CliClientResult, Client, ClientError};
pub use commands::Commands;
