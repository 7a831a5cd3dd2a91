//! ID generation utilities for Draftr
//!
//! Provides functions for generating unique identifiers for runs and
//! archived drafts.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Generate a unique run ID
///
/// Format: `{timestamp_ms}-{random_hex}`
/// Example: `1738300800123-a1b2`
pub fn generate_run_id() -> String {
    let timestamp = now_ms();
    let random: u16 = rand::rng().random();
    format!("{}-{:04x}", timestamp, random)
}

/// Generate an ID for an archived draft
///
/// Format: `draft-{timestamp_ms}-{random_hex}`
pub fn generate_draft_id() -> String {
    let timestamp = now_ms();
    let random: u16 = rand::rng().random();
    format!("draft-{}-{:04x}", timestamp, random)
}
