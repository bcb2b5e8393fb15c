//! Type-analysis engine interface
//!
//! The extraction pipeline never parses or type-checks anything itself. It
//! reads the semantic model of an engine through [`TypeChecker`], a narrow
//! view over symbols, declarations and types. [`crate::program::Program`]
//! is the engine bundled with this crate; any other engine can be plugged
//! in by implementing the trait.

use crate::js_doc::JsDocTagInfo;
use std::path::Path;

/// Declaration kinds the pipeline distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Class,
    /// Anything else: functions, variables, enums, namespaces, unresolved aliases
    Other,
}

impl DeclarationKind {
    /// Whether an export with this declaration can describe a component's props
    pub fn is_component_contract(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Interface | DeclarationKind::TypeAlias | DeclarationKind::Class
        )
    }
}

/// Symbol flags relevant to prop extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SymbolFlags {
    /// Declared with `?`
    pub optional: bool,
    /// A data property
    pub property: bool,
    /// A method
    pub method: bool,
    /// A getter or setter
    pub accessor: bool,
}

impl SymbolFlags {
    /// Flags of a plain data property
    pub fn property() -> Self {
        Self {
            property: true,
            ..Self::default()
        }
    }

    /// Flags of a method
    pub fn method() -> Self {
        Self {
            method: true,
            ..Self::default()
        }
    }

    /// Mark as optional
    pub fn as_optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Read-only view of a type-analysis engine
///
/// Implementations must be pure from the caller's point of view: the same
/// query on the same handles always answers the same way, so one engine
/// instance can serve many extraction calls.
pub trait TypeChecker {
    /// Handle to a named declaration (module, export, property, ...)
    type Symbol: Clone;
    /// Handle to a resolved type
    type Type: Clone;
    /// Handle to one declaration site of a symbol
    type Declaration: Clone;

    /// Module symbol of a source file, `None` if the file is not a module
    fn module_symbol(&self, file: &Path) -> Option<Self::Symbol>;

    /// Exported symbols of a module, in export enumeration order
    fn exports_of_module(&self, module: &Self::Symbol) -> Vec<Self::Symbol>;

    /// Name of a symbol (the exported name for exports)
    fn symbol_name(&self, symbol: &Self::Symbol) -> String;

    /// Declarations of a symbol, first declaration first
    fn declarations(&self, symbol: &Self::Symbol) -> Vec<Self::Declaration>;

    /// Kind of a declaration
    fn declaration_kind(&self, declaration: &Self::Declaration) -> DeclarationKind;

    /// Declaration that carries the symbol's value, if any
    fn value_declaration(&self, symbol: &Self::Symbol) -> Option<Self::Declaration>;

    /// Documentation text, `None` when the symbol cannot carry documentation
    fn documentation_comment(&self, symbol: &Self::Symbol) -> Option<String>;

    /// Raw JSDoc tags in declaration order
    fn jsdoc_tags(&self, symbol: &Self::Symbol) -> Vec<JsDocTagInfo>;

    /// Declared type of a symbol (instance type for classes)
    fn declared_type_of_symbol(&self, symbol: &Self::Symbol) -> Self::Type;

    /// Flags of a symbol
    fn symbol_flags(&self, symbol: &Self::Symbol) -> SymbolFlags;

    /// Type of a property symbol as seen from one of its declarations
    fn type_of_symbol_at_location(
        &self,
        symbol: &Self::Symbol,
        declaration: &Self::Declaration,
    ) -> Self::Type;

    /// Properties of a type, including inherited ones
    fn properties_of_type(&self, ty: &Self::Type) -> Vec<Self::Symbol>;

    /// Member types if the type is a union
    fn union_members(&self, ty: &Self::Type) -> Option<Vec<Self::Type>>;

    /// Member types if the type is an intersection
    fn intersection_members(&self, ty: &Self::Type) -> Option<Vec<Self::Type>>;

    /// Literal value if the type is a string literal type
    fn string_literal_value(&self, ty: &Self::Type) -> Option<String>;

    /// Canonical single-line printable form
    fn type_to_string(&self, ty: &Self::Type) -> String;
}
