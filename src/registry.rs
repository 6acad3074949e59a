//! Release metadata sources.
//!
//! A [`ReleaseSource`] turns a package name into a validated
//! [`ReleaseRecord`] and answers whether a formula for that release is
//! already published upstream.
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::Result;

/// npm registry implementation.
pub mod npm;

/// Validated release record and the raw manifest shapes it is built from.
pub mod record;

pub use record::ReleaseRecord;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest published release of `package`.
    async fn fetch_latest(&self, package: &str) -> Result<ReleaseRecord>;

    /// Whether a formula for `release` already exists upstream. A missing
    /// formula is `Ok(false)`, never an error.
    async fn published_file_exists(
        &self,
        release: &ReleaseRecord,
    ) -> Result<bool>;
}
