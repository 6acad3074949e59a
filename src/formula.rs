//! Homebrew formula generation from a [`ReleaseRecord`].
//!
//! Generation is pure: the same record and test spec always produce the
//! same [`Artifact`], byte for byte.
use crate::{Result, config::Config, registry::ReleaseRecord};

/// Description sanitization for `brew audit`.
pub mod description;

/// Section based document builder.
pub mod document;

/// SPDX license handling.
pub mod license;

/// Package name case transforms.
pub mod naming;

use document::{Document, Substitutions};
use license::License;

const PREAMBLE: &[&str] = &["require \"language/node\"", ""];

const METADATA: &[&str] = &[
    "class {{formula}} < Formula",
    "  desc \"{{description}}\"",
    "  homepage \"{{homepage}}\"",
    "  url \"{{url}}\"",
    "  sha256 \"{{sha256}}\"",
    "  license {{license}}",
    "",
];

const LIVECHECK: &[&str] = &[
    "  livecheck do",
    "    url \"{{livecheck_url}}\"",
    r#"    regex(/["']version["']:\s*?["']([^"']+)["']/i)"#,
    "  end",
    "",
];

const DEPENDENCIES: &[&str] = &["  depends_on \"node\"", ""];

const INSTALL: &[&str] = &[
    "  def install",
    "    system \"npm\", \"install\", *Language::Node.std_npm_args(libexec)",
    "    bin.install_symlink Dir[\"#{libexec}/bin/*\"]",
    "  end",
    "",
];

const TEST_VERSION: &[&str] = &[
    "  test do",
    "    assert_match(version.to_s, shell_output(\"#{bin}/{{bin}} --version\"))",
];

const TEST_CUSTOM: &[&str] = &[
    "    assert_match({{test_output}}, shell_output(\"#{bin}/{{test_command}}\"))",
];

const FOOTER: &[&str] = &["  end", "end"];

/// Caller supplied verification: run `command` and expect `output` in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSpec {
    pub command: String,
    pub output: String,
}

/// A generated formula plus everything derived from the same inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Original package name.
    pub package: String,
    pub version: String,
    /// Kebab-case formula name, e.g. `my-cli`.
    pub name: String,
    /// Pascal-case Ruby class name, e.g. `MyCli`.
    pub class_name: String,
    /// File name relative to the formula directory, e.g. `my-cli.rb`.
    pub filename: String,
    pub content: String,
    pub pull_request_title: String,
    pub pull_request_body: String,
}

impl Artifact {
    /// Commit message used when adding or updating this formula.
    pub fn commit_message(&self, is_new: bool) -> String {
        if is_new {
            format!("{} {} (new formula)", self.name, self.version)
        } else {
            format!("{} {}", self.name, self.version)
        }
    }
}

/// Renders release records into formulae.
#[derive(Debug, Clone)]
pub struct FormulaGenerator {
    registry_url: String,
    package_url: String,
}

impl FormulaGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            registry_url: config.registry_url.trim_end_matches('/').into(),
            package_url: config.package_url.trim_end_matches('/').into(),
        }
    }

    /// Render `release` into a formula [`Artifact`].
    ///
    /// Fails with [`crate::BrewsmithError::Template`] when a required value (for
    /// example the tarball digest) is missing.
    pub fn generate(
        &self,
        release: &ReleaseRecord,
        test: Option<&TestSpec>,
    ) -> Result<Artifact> {
        let document = Document::new()
            .section("preamble", PREAMBLE)
            .section("metadata", METADATA)
            .section("livecheck", LIVECHECK)
            .section("dependencies", DEPENDENCIES)
            .section("install", INSTALL)
            .section("test_version", TEST_VERSION)
            .optional_section("test_custom", TEST_CUSTOM, test.is_some())
            .section("footer", FOOTER);

        let content = document.render(&self.substitutions(release, test))?;

        let name = naming::kebab_case(&release.name);
        let id = format!("{}@{}", release.name, release.version);

        Ok(Artifact {
            package: release.name.clone(),
            version: release.version.clone(),
            class_name: naming::pascal_case(&release.name),
            filename: naming::formula_filename(&release.name),
            name,
            content,
            pull_request_title: format!("publish `{id}`").to_lowercase(),
            pull_request_body: format!(
                "Publish [`{id}`]({}/{}/v/{}).",
                self.package_url, release.name, release.version
            ),
        })
    }

    fn substitutions(
        &self,
        release: &ReleaseRecord,
        test: Option<&TestSpec>,
    ) -> Substitutions {
        let mut values = Substitutions::new();

        values.insert("formula", naming::pascal_case(&release.name));
        values.insert(
            "description",
            ruby_escape(&description::sanitize(&release.description)),
        );
        values.insert("homepage", ruby_escape(&release.homepage));
        values.insert("url", ruby_escape(&release.tarball_url));
        values.insert(
            "license",
            License::parse(&release.license).formula_value(),
        );
        values.insert(
            "livecheck_url",
            format!("{}/{}/latest", self.registry_url, release.name),
        );

        // absent values stay unresolved and fail rendering
        if let Some(sha256) = &release.sha256 {
            values.insert("sha256", sha256.to_string());
        }

        if let Some(bin) = release.primary_binary() {
            values.insert("bin", ruby_escape(bin));
        }

        if let Some(test) = test {
            values.insert("test_command", ruby_escape(&test.command));
            values.insert(
                "test_output",
                format!("\"{}\"", ruby_escape(&test.output)),
            );
        }

        values
    }
}

/// Escape a value for a double-quoted Ruby string literal.
fn ruby_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("#{", "\\#{")
}
