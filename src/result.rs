//! Result type used at the binary boundary.
//!
//! Library code returns [`crate::error::Result`]; `main` converts everything
//! into a `color-eyre` report so failures are rendered with context and the
//! process exits non-zero.
//!
//! ```rust,ignore
//! use crate::result::Result;
//!
//! fn main() -> Result<()> {
//!     color_eyre::install()?;
//!     Ok(())
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used by the `brewsmith` binary.
pub type Result<T> = EyreResult<T>;
