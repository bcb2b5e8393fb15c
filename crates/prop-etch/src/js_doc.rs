//! JSDoc comment parsing
//!
//! Turns the text of a `/** ... */` block into the raw pieces an analysis
//! engine hands out: the documentation text (everything before the first
//! tag line) and one [`JsDocTagInfo`] per `@tag`. Formatting those tags into
//! the canonical `@name content` form happens later, in [`crate::tags`].

use serde::{Deserialize, Serialize};

/// Text attached to a raw JSDoc tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagText {
    /// Plain string
    Plain(String),
    /// Display parts, concatenated verbatim when rendered
    Parts(Vec<String>),
}

impl TagText {
    /// Render the text as a single string
    pub fn to_text(&self) -> String {
        match self {
            TagText::Plain(text) => text.clone(),
            TagText::Parts(parts) => parts.concat(),
        }
    }
}

impl From<&str> for TagText {
    fn from(text: &str) -> Self {
        TagText::Plain(text.to_string())
    }
}

/// A raw JSDoc tag record: the name after `@` and whatever text follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsDocTagInfo {
    /// Tag name without the `@`
    pub name: String,
    /// Tag text, absent for bare tags such as `@internal`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<TagText>,
}

impl JsDocTagInfo {
    /// Create a tag without text
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
        }
    }

    /// Set plain text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(TagText::Plain(text.into()));
        self
    }

    /// Set display parts
    pub fn with_parts(mut self, parts: Vec<String>) -> Self {
        self.text = Some(TagText::Parts(parts));
        self
    }
}

/// Parsed JSDoc block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsDoc {
    /// Documentation text before the first tag line
    pub description: String,
    /// Raw tags in declaration order
    pub tags: Vec<JsDocTagInfo>,
}

impl JsDoc {
    /// Parse JSDoc from a comment string
    ///
    /// Accepts the comment with or without its `/**` and `*/` delimiters.
    pub fn parse(comment: &str) -> Self {
        let lines = clean_jsdoc_lines(comment);

        let first_tag = lines
            .iter()
            .position(|line| line.trim_start().starts_with('@'))
            .unwrap_or(lines.len());

        let description = lines[..first_tag].join("\n").trim().to_string();
        let tags = parse_tags(&lines[first_tag..]);

        Self { description, tags }
    }

    /// Check if this doc is empty
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.tags.is_empty()
    }
}

/// Strip comment delimiters and the leading `*` gutter from every line
fn clean_jsdoc_lines(comment: &str) -> Vec<String> {
    let body = comment.trim();
    let body = body.strip_prefix("/*").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    body.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let content = if let Some(rest) = trimmed.strip_prefix('*') {
                rest.strip_prefix(' ').unwrap_or(rest)
            } else {
                trimmed
            };
            content.trim_end().to_string()
        })
        .collect()
}

/// Collect tags from the lines following the description
fn parse_tags(lines: &[String]) -> Vec<JsDocTagInfo> {
    let mut tags = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in lines {
        if let Some(after_at) = line.trim_start().strip_prefix('@') {
            if let Some((name, text)) = current.take() {
                tags.push(finish_tag(name, text));
            }

            let name_len = after_at
                .char_indices()
                .find(|(_, c)| !is_tag_name_char(*c))
                .map(|(i, _)| i)
                .unwrap_or(after_at.len());
            let name = after_at[..name_len].to_string();
            let rest = &after_at[name_len..];
            let text = if rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                rest
            };
            current = Some((name, text.to_string()));
        } else if let Some((_, ref mut text)) = current {
            text.push('\n');
            text.push_str(line);
        }
    }

    if let Some((name, text)) = current {
        tags.push(finish_tag(name, text));
    }

    tags
}

fn finish_tag(name: String, text: String) -> JsDocTagInfo {
    let text = text.trim_end();
    let text = text.trim_start_matches('\n');
    if text.is_empty() {
        JsDocTagInfo::new(name)
    } else {
        JsDocTagInfo::new(name).with_text(text)
    }
}

fn is_tag_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
