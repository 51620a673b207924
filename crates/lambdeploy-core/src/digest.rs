//! Content digests for deployment artifacts.
//!
//! The function platform identifies code bundles by the base64-encoded
//! SHA-256 of their bytes. Computing the same digest locally lets the
//! deployer tell whether a remote layer already holds an artifact.

use std::fs::File;
use std::io;
use std::path::Path;

use base64::prelude::*;
use sha2::{Digest, Sha256};

/// Stream a file through SHA-256 and return the base64 digest.
pub fn code_sha256(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(BASE64_STANDARD.encode(hasher.finalize()))
}

/// Digest of an in-memory buffer, identical to [`code_sha256`] for the same bytes.
pub fn code_sha256_bytes(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(Sha256::digest(bytes))
}
