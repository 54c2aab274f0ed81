//! gsctl - game-server supervisor CLI
//!
//! # Examples
//!
//! ```bash
//! # Show every instance
//! gsctl status --pretty
//!
//! # Take an instance down for maintenance
//! gsctl stop arena-1 --reason "map rotation"
//!
//! # Bring it back
//! gsctl restart arena-1
//! ```

use gs_cli::{Cli, Client, Commands};

use std::process::ExitCode;

use clap::Parser;

const TOKEN_ENV: &str = "GS_TOKEN";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Server URL: explicit flag > supervisor config
    let server_url = match cli.server {
        Some(url) => url,
        None => match discover_server_url() {
            Some(url) => url,
            None => return ExitCode::FAILURE,
        },
    };

    let token = cli.token.or_else(|| std::env::var(TOKEN_ENV).ok());
    let client = Client::new(&server_url, token.as_deref());

    let result = match cli.command {
        Commands::Status { key: None } => client.list_instances().await,
        Commands::Status { key: Some(key) } => client.get_instance(&key).await,
        Commands::Restart { key } => client.restart_instance(&key).await,
        Commands::Stop { key, reason } => client.stop_instance(&key, reason.as_deref()).await,
        Commands::UpdateCheck { key } => client.check_for_update(&key).await,
    };

    // Handle result
    match result {
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read the control API URL from the supervisor's configuration.
fn discover_server_url() -> Option<String> {
    match gs_config::Config::load() {
        Ok(config) => Some(config.server.public_url()),
        Err(e) => {
            eprintln!("Error reading supervisor config: {}", e);
            eprintln!();
            eprintln!("Specify a server URL explicitly:");
            eprintln!("  gsctl --server http://127.0.0.1:8700 <command>");
            None
        }
    }
}
