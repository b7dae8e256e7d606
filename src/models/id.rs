//! Deterministic identifiers for suites and test cases.
//!
//! None of the supported frameworks hand out an id that survives across runs,
//! so ids are content hashes of what identifies the suite or test. Re-running
//! the same suite yields the same ids, which lets callers diff two runs.

use sha2::{Digest, Sha256};

/// Width of the hex token, in characters.
pub const ID_LEN: usize = 12;

/// Hash arbitrary text into a short hex token.
pub fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut out = String::with_capacity(ID_LEN);
    for byte in digest.iter().take(ID_LEN / 2) {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Suite id: hash of its file path, or of the synthesized group key.
pub fn suite_id(suite_key: &str) -> String {
    short_hash(suite_key)
}

/// Test id: hash of `"<suite key>:<full test name>"`.
pub fn test_id(suite_key: &str, full_name: &str) -> String {
    short_hash(&format!("{}:{}", suite_key, full_name))
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
