use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "gsctl")]
#[command(about = "Control a running game-server supervisor")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Control API URL (defaults to the public URL in the supervisor config)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Operator JWT (defaults to $GS_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
