//! `{NAME}` placeholder substitution for baked configuration templates.
//!
//! A placeholder is `{` + `[A-Z_][A-Z0-9_]*` + `}`. Any other brace text
//! (PHP arrays, JSON, `{{`) passes through unchanged.

use crate::env::RawEnvironment;
use std::collections::BTreeSet;

/// Result of rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rendered {
    /// Rendered text.
    pub text: String,
    /// Placeholders replaced with a set variable (sorted, unique).
    pub substituted: Vec<String>,
    /// Placeholders whose variable was unset and became `""` (sorted, unique).
    pub missing: Vec<String>,
}

impl Rendered {
    /// Returns true when every placeholder had a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Replace every placeholder with its variable's value, verbatim.
///
/// Unset variables render as `""` and are reported in [`Rendered::missing`].
/// Values are never re-scanned, so a value containing `{X}` stays literal.
#[must_use]
pub fn render_placeholders(template: &str, env: &RawEnvironment) -> Rendered {
    let mut text = String::with_capacity(template.len());
    let mut substituted = BTreeSet::new();
    let mut missing = BTreeSet::new();

    scan(template, |segment| match segment {
        Segment::Text(literal) => text.push_str(literal),
        Segment::Placeholder(name) => match env.get(name) {
            Some(value) => {
                text.push_str(value);
                substituted.insert(name.to_string());
            },
            None => {
                missing.insert(name.to_string());
            },
        },
    });

    if !missing.is_empty() {
        tracing::debug!(missing = ?missing, "template placeholders without a value");
    }

    Rendered {
        text,
        substituted: substituted.into_iter().collect(),
        missing: missing.into_iter().collect(),
    }
}

/// Placeholder names in first-seen order, without duplicates.
#[must_use]
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    scan(template, |segment| {
        if let Segment::Placeholder(name) = segment {
            if seen.insert(name) {
                names.push(name.to_string());
            }
        }
    });
    names
}

enum Segment<'t> {
    Text(&'t str),
    Placeholder(&'t str),
}

fn scan<'t>(template: &'t str, mut visit: impl FnMut(Segment<'t>)) {
    let mut rest = template;
    while let Some((before, after)) = rest.split_once('{') {
        visit(Segment::Text(before));
        match after.split_once('}') {
            Some((name, tail)) if is_placeholder_name(name) => {
                visit(Segment::Placeholder(name));
                rest = tail;
            },
            _ => {
                visit(Segment::Text("{"));
                rest = after;
            },
        }
    }
    visit(Segment::Text(rest));
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_uppercase() || first == '_')
        && chars.all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
}
