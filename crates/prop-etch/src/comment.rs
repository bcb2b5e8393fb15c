//! Comment extraction
//!
//! Produces the description, the aggregated tag map and the full comment
//! text for any documented symbol.

use crate::checker::TypeChecker;
use crate::tags::{format_tag, tag_map_from_lines, TagMap};
use serde::Serialize;

/// Documentation attached to a symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDoc {
    /// Documentation text with `\r\n` normalized to `\n`
    pub description: String,
    /// Description and formatted tag lines separated by a blank line
    pub full_comment: String,
    /// Tags keyed by name
    pub tags: TagMap,
}

/// Extract the documentation of a symbol
///
/// A symbol without documentation-comment support yields an empty
/// [`CommentDoc`]; that is the normal "no docs" case, not an error.
pub fn extract_comment<C: TypeChecker>(checker: &C, symbol: &C::Symbol) -> CommentDoc {
    let Some(comment) = checker.documentation_comment(symbol) else {
        return CommentDoc::default();
    };

    let description = comment.replace("\r\n", "\n");
    let tag_lines: Vec<String> = checker
        .jsdoc_tags(symbol)
        .iter()
        .map(format_tag)
        .collect();

    let tags = tag_map_from_lines(tag_lines.iter().map(String::as_str));
    let full_comment = format!("{}\n\n{}", description, tag_lines.join("\n"))
        .trim()
        .to_string();

    CommentDoc {
        description,
        full_comment,
        tags,
    }
}
