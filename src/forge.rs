//! Remote repository access for publishing formulae.
//!
//! The [`traits::Forge`] trait exposes the handful of branch, contents and
//! pull request operations the sync needs; [`manager::ForgeManager`] wraps
//! an implementation with timeouts and dry-run handling.

/// Connection settings and token resolution.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Timeout and dry-run wrapper around a [`traits::Forge`].
pub mod manager;

/// Request and response types shared by forge implementations.
pub mod request;

/// Common trait for forge platform abstraction.
pub mod traits;
