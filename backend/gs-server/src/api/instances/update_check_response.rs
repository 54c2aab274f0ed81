use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UpdateCheckResponse {
    pub instance: String,
    /// `None` when the update provider could not be reached.
    pub update_available: Option<bool>,
}
