//! License field rendering.
//!
//! Homebrew only accepts current SPDX identifiers. Anything else is emitted
//! as `:cannot_represent` with the published string kept as a comment so
//! that generation never fails on an unusual license.

/// Formula marker for licenses that have no SPDX representation.
pub const CANNOT_REPRESENT: &str = ":cannot_represent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum License {
    /// A current (non-deprecated) SPDX license identifier.
    Spdx(String),
    /// The original, unrecognized license string.
    Unrecognized(String),
}

impl License {
    pub fn parse(id: &str) -> Self {
        match spdx::license_id(id) {
            // the lookup ignores a trailing `+`, so require an exact match
            Some(license)
                if license.name == id && !license.is_deprecated() =>
            {
                Self::Spdx(id.to_string())
            }
            _ => Self::Unrecognized(id.to_string()),
        }
    }

    /// Value placed after the `license` keyword in the formula.
    pub fn formula_value(&self) -> String {
        match self {
            Self::Spdx(id) => format!("\"{id}\""),
            Self::Unrecognized(original) if original.trim().is_empty() => {
                CANNOT_REPRESENT.to_string()
            }
            Self::Unrecognized(original) => {
                format!("{CANNOT_REPRESENT} # {original}")
            }
        }
    }
}
