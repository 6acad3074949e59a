pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod formula;
pub mod hasher;
pub mod registry;
pub mod sync;
pub mod validation;

pub use error::{BrewsmithError, Result};

#[cfg(test)]
pub mod test_helpers;
