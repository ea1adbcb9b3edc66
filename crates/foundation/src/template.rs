//! Named placeholder substitution for titles and paths.
//!
//! A placeholder is `{name}` where `name` is a non-empty run of ASCII
//! alphanumerics, `_` or `-`. Any other brace text (`{}`, `{ a }`, a lone `{`)
//! is copied through literally. Substitution is strict: a placeholder without a
//! matching parameter is an error rather than being left in the output.

use std::fmt;

use crate::params::RouteParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    MissingParam { name: String, template: String },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::MissingParam { name, template } => {
                write!(f, "missing parameter `{name}` for template `{template}`")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else { break };
        let name = &after[..close];
        if is_name(name) {
            if open > 0 {
                out.push(Segment::Literal(&rest[..open]));
            }
            out.push(Segment::Placeholder(name));
            rest = &after[close + 1..];
        } else {
            // Not a placeholder: keep the brace and scan on from the next byte.
            out.push(Segment::Literal(&rest[..open + 1]));
            rest = after;
        }
    }
    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    out
}

/// Placeholder names referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    segments(template)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Substitutes every `{name}` in `template` with the matching entry of `params`.
pub fn format(template: &str, params: &RouteParams) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                let value = params
                    .get(name)
                    .ok_or_else(|| TemplateError::MissingParam {
                        name: name.to_string(),
                        template: template.to_string(),
                    })?;
                out.push_str(value);
            }
        }
    }
    Ok(out)
}
