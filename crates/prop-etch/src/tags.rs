//! Tag formatting and tag maps
//!
//! Every raw tag is first rendered as one `@name content` line. A tag whose
//! text starts with `.subkey` is rendered as `@name.subkey content`, which
//! lets doc authors write compound keys such as `@property.type`. The
//! rendered line is then split back into `(key, content)` on the first space
//! after the name to build a [`TagMap`].

use crate::js_doc::JsDocTagInfo;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Leading `.subkey` followed by the remaining content
    static ref SUBKEY_REGEX: Regex = Regex::new(r"(?s)^\.(\S+)(.*)$").unwrap();

    /// `@key content`, split on the first space after the key
    static ref TAG_LINE_REGEX: Regex = Regex::new(r"(?s)^@(\S+) (.*)$").unwrap();
}

/// Value of one tag name: a single occurrence or every occurrence in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Single(String),
    Multiple(Vec<String>),
}

impl TagValue {
    /// First occurrence
    pub fn first(&self) -> &str {
        match self {
            TagValue::Single(value) => value,
            TagValue::Multiple(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// All occurrences in declaration order
    pub fn values(&self) -> Vec<&str> {
        match self {
            TagValue::Single(value) => vec![value.as_str()],
            TagValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            TagValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = TagValue::Multiple(vec![first, value]);
            }
            TagValue::Multiple(values) => values.push(value),
        }
    }
}

/// Tag name to content, in first-seen order
pub type TagMap = IndexMap<String, TagValue>;

/// Render one raw tag as a single `@name content` line
///
/// Without a `.subkey` prefix the line always carries a space after the
/// name, so a bare tag renders as `"@name "`.
pub fn format_tag(tag: &JsDocTagInfo) -> String {
    let text = tag
        .text
        .as_ref()
        .map(|text| text.to_text())
        .unwrap_or_default();

    if let Some(caps) = SUBKEY_REGEX.captures(&text) {
        format!("@{}.{} {}", tag.name, &caps[1], caps[2].trim())
    } else {
        format!("@{} {}", tag.name, text.trim())
    }
}

/// Split a formatted tag line into key and content
///
/// Returns `None` for lines that do not follow the `@key content` shape.
pub fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    let caps = TAG_LINE_REGEX.captures(line)?;
    let key = caps.get(1)?.as_str();
    let content = caps.get(2)?.as_str();
    Some((key, content))
}

/// Add one occurrence, turning the entry into a list on repeats
pub fn insert_tag(tags: &mut TagMap, key: &str, content: &str) {
    match tags.get_mut(key) {
        Some(existing) => existing.push(content.to_string()),
        None => {
            tags.insert(key.to_string(), TagValue::Single(content.to_string()));
        }
    }
}

/// Build a tag map from already formatted tag lines
///
/// Lines that do not match `@key content` are skipped.
pub fn tag_map_from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> TagMap {
    let mut tags = TagMap::new();
    for line in lines {
        match split_tag_line(line) {
            Some((key, content)) => insert_tag(&mut tags, key, content),
            None => tracing::debug!(line, "skipping malformed tag line"),
        }
    }
    tags
}
