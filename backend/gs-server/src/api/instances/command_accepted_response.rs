use serde::Serialize;

/// Acknowledges that a command was queued for an instance supervisor.
#[derive(Debug, Serialize)]
pub struct CommandAcceptedResponse {
    pub instance: String,
    pub command: &'static str,
}
