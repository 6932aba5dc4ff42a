//! Markup stripping for safe display
//!
//! No tag or attribute survives. Text content is kept, except inside
//! elements whose body is executable or invisible (script, style, iframe,
//! object, embed, template, noscript), which is dropped together with
//! the element.

use regex::Regex;

use crate::ClassifierError;

#[derive(Debug, Clone)]
pub struct Sanitizer {
    forbidden_blocks: Regex,
    tags: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self, ClassifierError> {
        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ClassifierError::InvalidPattern {
                name: name.to_string(),
                source,
            })
        };

        Ok(Self {
            forbidden_blocks: compile(
                "forbidden_blocks",
                r"(?is)<(script|style|iframe|object|embed|template|noscript)\b[^>]*>.*?</(script|style|iframe|object|embed|template|noscript)\s*>",
            )?,
            tags: compile("tags", r"(?s)<[^>]*>?")?,
        })
    }

    pub fn sanitize(&self, payload: &str) -> String {
        let without_blocks = self.forbidden_blocks.replace_all(payload, "");
        let text = self.tags.replace_all(&without_blocks, "");
        escape_text(&text)
    }
}

/// Escape the characters that would re-open markup
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
