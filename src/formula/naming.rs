//! Stable case transforms used for formula file, display, and class names.
use heck::{ToKebabCase, ToUpperCamelCase};

/// `@scope/fooBar` -> `scope-foo-bar`
pub fn kebab_case(input: &str) -> String {
    input.to_kebab_case()
}

/// `@scope/foo-bar` -> `ScopeFooBar`
pub fn pascal_case(input: &str) -> String {
    input.to_upper_camel_case()
}

/// Formula file name for a package, e.g. `foo-bar.rb`.
pub fn formula_filename(package: &str) -> String {
    format!("{}.rb", kebab_case(package))
}

/// Working branch used to publish a package's formula.
pub fn working_branch(package: &str) -> String {
    format!("update-{}-formula", kebab_case(package))
}
