use crate::{Result, SupervisorError};

use gs_core::ErrorLocation;

use std::panic::Location;

use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compare the SHA-256 of `bytes` with a hex digest, ignoring case.
#[track_caller]
pub fn verify_checksum(url: &str, bytes: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_hex(bytes);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        return Ok(());
    }

    Err(SupervisorError::Checksum {
        url: url.to_string(),
        expected: expected.to_string(),
        actual,
        location: ErrorLocation::from(Location::caller()),
    })
}
