pub mod error;
pub mod extractors;
pub mod heartbeat;
pub mod instances;
