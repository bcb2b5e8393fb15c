//! SWC/deno_ast TypeScript parsing
//!
//! Parses one source file with deno_ast and exposes the comment lookups the
//! lowering pass needs. The parsed AST never outlives program construction;
//! only the lowered model is kept.

use crate::diagnostics::{DocError, DocResult};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment, CommentKind};
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A parsed TypeScript module
pub struct ParsedModule {
    source: ParsedSource,
    path: PathBuf,
}

impl ParsedModule {
    /// Module AST, `None` when the file parsed as a script
    pub fn module(&self) -> Option<&swc_ast::Module> {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => Some(m),
            deno_ast::ProgramRef::Script(_) => None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get leading comments for a position
    pub fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        // positions handed out by SWC are valid source positions
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        self.source
            .comments()
            .get_leading(source_pos)
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// Text of the JSDoc block directly in front of `span`
    ///
    /// Returns the last `/** ... */` among the leading comments, without its
    /// delimiters, the way SWC stores comment text.
    pub fn jsdoc_for_span(&self, span: Span) -> Option<String> {
        self.leading_comments(span.lo)
            .iter()
            .rev()
            .find(|comment| comment.kind == CommentKind::Block && comment.text.starts_with('*'))
            .map(|comment| comment.text.to_string())
    }

    /// First JSDoc block found in front of any of `spans`, tried in order
    pub fn jsdoc_for_spans(&self, spans: impl IntoIterator<Item = Span>) -> Option<String> {
        spans.into_iter().find_map(|span| self.jsdoc_for_span(span))
    }
}

/// Parse TypeScript source code from a string
///
/// `path` must be absolute; it becomes the module specifier.
pub fn parse_typescript_source(
    path: impl AsRef<Path>,
    source: impl Into<Arc<str>>,
) -> DocResult<ParsedModule> {
    let path = path.as_ref();
    let source: Arc<str> = source.into();

    let media_type = match MediaType::from_path(path) {
        MediaType::Unknown => MediaType::TypeScript,
        known => known,
    };

    let specifier = deno_ast::ModuleSpecifier::from_file_path(path)
        .map_err(|_| DocError::InvalidPath(path.display().to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source,
        media_type,
        capture_tokens: true,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| DocError::parse(path, e.to_string()))?;

    Ok(ParsedModule {
        source: parsed,
        path: path.to_path_buf(),
    })
}

/// Convert a string literal node to a Rust string
///
/// String values are stored as WTF-8; lone surrogates are replaced.
pub fn str_value(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}

/// Name of an import/export binding
pub fn module_export_name(name: &swc_ast::ModuleExportName) -> String {
    match name {
        swc_ast::ModuleExportName::Ident(i) => i.sym.to_string(),
        swc_ast::ModuleExportName::Str(s) => str_value(s),
    }
}

/// Get the name of a property key
pub fn prop_name_str(name: &swc_ast::PropName) -> Option<String> {
    match name {
        swc_ast::PropName::Ident(i) => Some(i.sym.to_string()),
        swc_ast::PropName::Str(s) => Some(str_value(s)),
        swc_ast::PropName::Num(n) => Some(n.value.to_string()),
        swc_ast::PropName::BigInt(b) => Some(b.value.to_string()),
        swc_ast::PropName::Computed(_) => None,
    }
}

/// Get the name of a type member key, computed keys excluded
pub fn member_key_str(key: &swc_ast::Expr, computed: bool) -> Option<String> {
    if computed {
        return None;
    }
    match key {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(str_value(s)),
        swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(n.value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typescript_source() {
        let parsed = parse_typescript_source(
            "/tmp/button.ts",
            "export interface Props { label: string }",
        )
        .unwrap();
        assert_eq!(parsed.module().unwrap().body.len(), 1);
        assert_eq!(parsed.path(), Path::new("/tmp/button.ts"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = match parse_typescript_source("/tmp/broken.ts", "export interface {") {
            Ok(_) => panic!("expected a parse error"),
            Err(err) => err,
        };
        assert!(matches!(err, DocError::TypeScriptParse { .. }));
        assert_eq!(err.path(), Some(Path::new("/tmp/broken.ts")));
    }

    #[test]
    fn test_jsdoc_before_export() {
        let source = r#"
/**
 * Button props
 */
export interface Props {}
"#;
        let parsed = parse_typescript_source("/tmp/props.ts", source).unwrap();
        let module = parsed.module().unwrap();

        let Some(swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export))) =
            module.body.first()
        else {
            panic!("expected an export declaration");
        };
        let jsdoc = parsed.jsdoc_for_span(export.span).unwrap();
        assert!(jsdoc.contains("Button props"));
    }

    #[test]
    fn test_last_jsdoc_block_wins() {
        let source = r#"
/** Stale license banner */

/**
 * Button props
 */
export interface Props {}
"#;
        let parsed = parse_typescript_source("/tmp/props.ts", source).unwrap();
        let module = parsed.module().unwrap();

        let Some(swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export))) =
            module.body.first()
        else {
            panic!("expected an export declaration");
        };
        let jsdoc = parsed.jsdoc_for_span(export.span).unwrap();
        assert!(jsdoc.contains("Button props"));
        assert!(!jsdoc.contains("banner"));
    }

    #[test]
    fn test_line_comment_is_not_jsdoc() {
        let source = "// plain\nexport type A = string;";
        let parsed = parse_typescript_source("/tmp/a.ts", source).unwrap();
        let module = parsed.module().unwrap();

        let Some(swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export))) =
            module.body.first()
        else {
            panic!("expected an export declaration");
        };
        assert!(parsed.jsdoc_for_span(export.span).is_none());
    }
}
