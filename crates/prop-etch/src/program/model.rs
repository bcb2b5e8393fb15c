//! Lowered declaration model
//!
//! Owned, AST-free description of one source file: its declarations, the
//! members of interfaces, classes and type literals, and its import/export
//! tables.

use super::types::TsType;
use crate::checker::DeclarationKind;
use crate::js_doc::JsDoc;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Index of a file inside a program
pub type FileId = usize;

/// Kind of a type or class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Method,
    Getter,
    Setter,
}

/// Literal-ish initializer used to infer an unannotated property's type
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    Boolean(bool),
    Number(f64),
    String(String),
    Template,
    BigInt(String),
    Null,
    Undefined,
    Array,
    EmptyObject,
    /// `new Name(...)`
    New(String),
    /// `expr as T`, `<T>expr`
    Typed(TsType),
    Other,
}

/// Member of an interface, class or type literal
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub optional: bool,
    pub readonly: bool,
    /// Annotated type; the function type for methods
    pub ty: Option<TsType>,
    pub initializer: Option<Initializer>,
    pub doc: JsDoc,
}

impl Member {
    /// Property member without docs
    pub fn property(name: impl Into<String>, ty: Option<TsType>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            optional: false,
            readonly: false,
            ty,
            initializer: None,
            doc: JsDoc::default(),
        }
    }

    pub fn as_optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Declaration body
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Interface {
        extends: Vec<TsType>,
        members: Vec<Arc<Member>>,
    },
    TypeAlias {
        ty: TsType,
    },
    Class {
        extends: Option<TsType>,
        members: Vec<Arc<Member>>,
    },
    Enum,
    Function,
    Variable {
        ty: Option<TsType>,
    },
    Namespace,
}

/// A named top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    pub kind: DeclKind,
    pub doc: JsDoc,
}

impl Decl {
    pub fn declaration_kind(&self) -> DeclarationKind {
        match self.kind {
            DeclKind::Interface { .. } => DeclarationKind::Interface,
            DeclKind::TypeAlias { .. } => DeclarationKind::TypeAlias,
            DeclKind::Class { .. } => DeclarationKind::Class,
            _ => DeclarationKind::Other,
        }
    }

    /// Whether the declaration introduces a value
    pub fn has_value(&self) -> bool {
        !matches!(
            self.kind,
            DeclKind::Interface { .. } | DeclKind::TypeAlias { .. }
        )
    }
}

/// One entry of a module's export table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// `export <decl>`, `export { local as exported }`, `export default`
    Local { exported: String, local: String },
    /// `export { imported as exported } from "specifier"`
    From {
        exported: String,
        specifier: String,
        imported: String,
    },
    /// `export * as exported from "specifier"`
    Namespace { exported: String, specifier: String },
}

impl ExportEntry {
    pub fn exported(&self) -> &str {
        match self {
            ExportEntry::Local { exported, .. }
            | ExportEntry::From { exported, .. }
            | ExportEntry::Namespace { exported, .. } => exported,
        }
    }
}

/// What an imported local name refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinding {
    Named { specifier: String, imported: String },
    Namespace { specifier: String },
}

/// Lowered source file
#[derive(Debug, Clone, Default)]
pub struct SourceModule {
    pub path: PathBuf,
    /// Has import or export syntax
    pub is_module: bool,
    /// Local declarations by name; same-name interfaces merge
    pub declarations: IndexMap<String, Vec<Arc<Decl>>>,
    /// Imported local names
    pub imports: HashMap<String, ImportBinding>,
    /// Export table in source order
    pub exports: Vec<ExportEntry>,
    /// Specifiers of `export * from`
    pub star_exports: Vec<String>,
    /// Every specifier this file mentions, in source order
    pub specifiers: Vec<String>,
    /// Specifiers that resolved to a loaded file
    pub resolved: HashMap<String, FileId>,
}

impl SourceModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn declare(&mut self, decl: Decl) {
        self.declarations
            .entry(decl.name.clone())
            .or_default()
            .push(Arc::new(decl));
    }

    pub fn export(&mut self, entry: ExportEntry) {
        self.is_module = true;
        self.exports.push(entry);
    }

    pub fn mention(&mut self, specifier: &str) {
        if !self.specifiers.iter().any(|s| s == specifier) {
            self.specifiers.push(specifier.to_string());
        }
    }
}
