//! Description rewriting required by `brew audit`'s desc cop.
use regex::Regex;
use std::sync::LazyLock;

static COMMAND_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)command ?line").unwrap());

// only one leading article, and only when followed by whitespace
static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:the|an?)\s").unwrap());

/// Normalize "command line" spellings to `command-line`, strip a single
/// leading article, and trim surrounding whitespace.
pub fn sanitize(description: &str) -> String {
    let normalized = COMMAND_LINE.replace_all(description, "command-line");
    let stripped = LEADING_ARTICLE.replace(&normalized, "");
    stripped.trim().to_string()
}
