use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Show every instance, or one instance by key
    Status {
        /// Instance key
        key: Option<String>,
    },

    /// Restart an instance, clearing a manual stop or crash-loop hold
    Restart {
        /// Instance key
        key: String,
    },

    /// Gracefully stop an instance; it stays down until restarted
    Stop {
        /// Instance key
        key: String,
        /// Reason passed to the server and shown in status
        #[arg(long)]
        reason: Option<String>,
    },

    /// Ask the update provider whether a new build is available
    UpdateCheck {
        /// Instance key
        key: String,
    },
}
