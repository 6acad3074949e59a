//! Structured formula document.
//!
//! A formula is built as an ordered list of named sections. Each section is
//! a block of template lines containing `{{placeholder}}` tokens. Optional
//! sections are only included when their data is present, so no line ever
//! has to be deleted after rendering.
use regex::{Captures, Regex};
use std::{collections::HashMap, sync::LazyLock};

use crate::{BrewsmithError, Result};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z0-9_]+)\}\}").unwrap());

#[derive(Debug, Clone)]
struct Section {
    name: &'static str,
    lines: &'static [&'static str],
}

/// Placeholder values keyed by token name.
pub type Substitutions = HashMap<&'static str, String>;

#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section that is always rendered.
    pub fn section(
        mut self,
        name: &'static str,
        lines: &'static [&'static str],
    ) -> Self {
        self.sections.push(Section { name, lines });
        self
    }

    /// Append a section rendered only when `present` is true.
    pub fn optional_section(
        self,
        name: &'static str,
        lines: &'static [&'static str],
        present: bool,
    ) -> Self {
        if present {
            self.section(name, lines)
        } else {
            self
        }
    }

    /// Render all sections, resolving every placeholder exactly once.
    ///
    /// Substituted values are never rescanned, so a value that happens to
    /// contain `{{...}}` is emitted verbatim. The result is trimmed and
    /// ends with a single newline.
    pub fn render(&self, values: &Substitutions) -> Result<String> {
        let mut rendered = Vec::new();

        for section in &self.sections {
            for line in section.lines {
                rendered.push(substitute(section.name, line, values)?);
            }
        }

        Ok(format!("{}\n", rendered.join("\n").trim()))
    }
}

fn substitute(
    section: &str,
    line: &str,
    values: &Substitutions,
) -> Result<String> {
    let mut missing = None;

    let output = PLACEHOLDER.replace_all(line, |caps: &Captures| {
        let token = &caps[1];
        match values.get(token) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| token.to_string());
                String::new()
            }
        }
    });

    if let Some(token) = missing {
        return Err(BrewsmithError::Template(format!(
            "{{{{{token}}}}} in section '{section}'"
        )));
    }

    Ok(output.into_owned())
}
