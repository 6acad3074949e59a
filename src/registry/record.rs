use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{BrewsmithError, Result, hasher::Sha256Digest};

/// License field as found in npm manifests. Older packages use an object
/// with a `type` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    Id(String),
    Legacy {
        #[serde(rename = "type")]
        kind: String,
    },
}

/// `bin` field: either a single path (binary named after the package) or
/// an ordered map of binary name to path.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BinField {
    Single(String),
    Map(Map<String, Value>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistField {
    pub tarball: Option<String>,
}

/// One entry of the registry document's `versions` map.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub license: Option<LicenseField>,
    pub dist: Option<DistField>,
    pub bin: Option<BinField>,
}

/// Immutable description of a publishable package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub name: String,
    pub version: String,
    pub description: String,
    pub homepage: String,
    /// License identifier exactly as published; may not be valid SPDX.
    pub license: String,
    pub tarball_url: String,
    /// Computed by the hasher; absent until the tarball has been hashed.
    pub sha256: Option<Sha256Digest>,
    /// Declared binary names in manifest order.
    pub binaries: Vec<String>,
}

impl ReleaseRecord {
    /// Validate a raw manifest into a record, rejecting absent or empty
    /// required fields.
    pub fn from_manifest(
        package: &str,
        manifest: VersionManifest,
    ) -> Result<Self> {
        let name = required(package, "name", manifest.name)?;
        let version = required(package, "version", manifest.version)?;
        let description =
            required(package, "description", manifest.description)?;
        let homepage = required(package, "homepage", manifest.homepage)?;
        let tarball_url = required(
            package,
            "dist.tarball",
            manifest.dist.and_then(|d| d.tarball),
        )?;

        let license = match manifest.license {
            Some(LicenseField::Id(id)) => id,
            Some(LicenseField::Legacy { kind }) => kind,
            None => String::new(),
        };

        let binaries = match manifest.bin {
            Some(BinField::Single(_)) => vec![unscoped(&name).to_string()],
            Some(BinField::Map(map)) => map.keys().cloned().collect(),
            None => vec![],
        };

        if binaries.is_empty() {
            return Err(BrewsmithError::invalid_release(
                package,
                "package does not declare any binaries",
            ));
        }

        Ok(Self {
            name,
            version,
            description,
            homepage,
            license,
            tarball_url,
            sha256: None,
            binaries,
        })
    }

    /// Returns a copy of this record carrying the computed tarball digest.
    pub fn with_sha256(self, sha256: Sha256Digest) -> Self {
        Self {
            sha256: Some(sha256),
            ..self
        }
    }

    /// The canonical executable: the first declared binary.
    pub fn primary_binary(&self) -> Option<&str> {
        self.binaries.first().map(String::as_str)
    }
}

fn required(
    package: &str,
    field: &str,
    value: Option<String>,
) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(BrewsmithError::invalid_release(
            package,
            format!("missing required field '{field}'"),
        )),
    }
}

fn unscoped(name: &str) -> &str {
    match name.split_once('/') {
        Some((scope, rest)) if scope.starts_with('@') => rest,
        _ => name,
    }
}
