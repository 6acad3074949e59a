//! Tarball download and SHA-256 digest computation.
//!
//! The registry only publishes sha512 integrity values, while formulae
//! require sha256, so the digest is always computed fresh from the bytes
//! served at the tarball URL.
use log::*;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{BrewsmithError, Result};

/// A SHA-256 digest as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Compute the digest of `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Downloads release tarballs and hashes them.
#[derive(Debug, Clone)]
pub struct TarballHasher {
    client: reqwest::Client,
}

impl TarballHasher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the full resource at `url` and return its SHA-256 digest.
    ///
    /// Any network failure or non-2xx status is a
    /// [`BrewsmithError::Fetch`]. There is no retry.
    pub async fn hash(&self, url: &str) -> Result<Sha256Digest> {
        debug!("downloading tarball: {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(BrewsmithError::fetch(format!(
                "failed to download {url}: status {status}"
            )));
        }

        let bytes = response.bytes().await?;
        let digest = Sha256Digest::of(&bytes);

        debug!("downloaded {} bytes, sha256: {digest}", bytes.len());

        Ok(digest)
    }
}
