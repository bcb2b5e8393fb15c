//! Test utilities and mock objects for prop-etch.
//!
//! [`MockChecker`] is a table-driven [`TypeChecker`]: symbols are added one
//! by one and refer to each other by index. It lets the pipeline be tested
//! without parsing any TypeScript.
//!
//! # Example
//!
//! ```
//! use prop_etch::checker::SymbolFlags;
//! use prop_etch::test::{MockChecker, MockSymbol, MockType};
//!
//! let mut checker = MockChecker::new();
//! let label = checker.add(
//!     MockSymbol::new("label")
//!         .with_flags(SymbolFlags::property())
//!         .with_type(MockType::Named("string".into())),
//! );
//! let props = checker.add(MockSymbol::new("Props").with_type(MockType::Object(vec![label])));
//! checker.add_module("/src/button.ts", vec![props]);
//! ```

use crate::checker::{DeclarationKind, SymbolFlags, TypeChecker};
use crate::diagnostics::DocResult;
use crate::js_doc::JsDocTagInfo;
use crate::parser::ComponentDoc;
use crate::program::{CompilerOptions, Program};
use crate::prop_type::TypeDescriptor;
use crate::props::{DefaultValue, PropItem, PropMap};
use crate::tags::TagMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Type of a mock symbol
#[derive(Debug, Clone, PartialEq)]
pub enum MockType {
    /// Printed as the given name
    Named(String),
    StringLiteral(String),
    Union(Vec<MockType>),
    Intersection(Vec<MockType>),
    /// Object type whose properties are the given symbols
    Object(Vec<usize>),
}

/// A mock symbol, built with `with_*` methods
#[derive(Debug, Clone)]
pub struct MockSymbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub ty: MockType,
    pub kind: DeclarationKind,
    pub doc: Option<String>,
    pub tags: Vec<JsDocTagInfo>,
    pub has_declaration: bool,
    pub has_doc_capability: bool,
    pub exports: Vec<usize>,
}

impl MockSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: SymbolFlags::default(),
            ty: MockType::Named("any".into()),
            kind: DeclarationKind::Other,
            doc: None,
            tags: Vec::new(),
            has_declaration: true,
            has_doc_capability: true,
            exports: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_type(mut self, ty: MockType) -> Self {
        self.ty = ty;
        self
    }

    /// Kind of the symbol's declaration
    pub fn with_kind(mut self, kind: DeclarationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_tag(mut self, tag: JsDocTagInfo) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn without_declaration(mut self) -> Self {
        self.has_declaration = false;
        self
    }

    /// Make `documentation_comment` answer `None`
    pub fn without_doc_capability(mut self) -> Self {
        self.has_doc_capability = false;
        self
    }
}

/// Table-driven [`TypeChecker`]
#[derive(Debug, Clone, Default)]
pub struct MockChecker {
    symbols: Vec<MockSymbol>,
    modules: HashMap<PathBuf, usize>,
}

impl MockChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol and return its handle
    pub fn add(&mut self, symbol: MockSymbol) -> usize {
        self.symbols.push(symbol);
        self.symbols.len() - 1
    }

    /// Register a module for `path` exporting `exports` in order
    pub fn add_module(&mut self, path: impl AsRef<Path>, exports: Vec<usize>) -> usize {
        let path = path.as_ref().to_path_buf();
        let mut module = MockSymbol::new(path.display().to_string());
        module.exports = exports;
        let id = self.add(module);
        self.modules.insert(path, id);
        id
    }

    fn symbol(&self, id: usize) -> &MockSymbol {
        &self.symbols[id]
    }
}

impl TypeChecker for MockChecker {
    type Symbol = usize;
    type Type = MockType;
    type Declaration = DeclarationKind;

    fn module_symbol(&self, file: &Path) -> Option<usize> {
        self.modules.get(file).copied()
    }

    fn exports_of_module(&self, module: &usize) -> Vec<usize> {
        self.symbol(*module).exports.clone()
    }

    fn symbol_name(&self, symbol: &usize) -> String {
        self.symbol(*symbol).name.clone()
    }

    fn declarations(&self, symbol: &usize) -> Vec<DeclarationKind> {
        let symbol = self.symbol(*symbol);
        if symbol.has_declaration {
            vec![symbol.kind]
        } else {
            Vec::new()
        }
    }

    fn declaration_kind(&self, declaration: &DeclarationKind) -> DeclarationKind {
        *declaration
    }

    fn value_declaration(&self, symbol: &usize) -> Option<DeclarationKind> {
        self.declarations(symbol).into_iter().next()
    }

    fn documentation_comment(&self, symbol: &usize) -> Option<String> {
        let symbol = self.symbol(*symbol);
        symbol
            .has_doc_capability
            .then(|| symbol.doc.clone().unwrap_or_default())
    }

    fn jsdoc_tags(&self, symbol: &usize) -> Vec<JsDocTagInfo> {
        self.symbol(*symbol).tags.clone()
    }

    fn declared_type_of_symbol(&self, symbol: &usize) -> MockType {
        self.symbol(*symbol).ty.clone()
    }

    fn symbol_flags(&self, symbol: &usize) -> SymbolFlags {
        self.symbol(*symbol).flags
    }

    fn type_of_symbol_at_location(&self, symbol: &usize, _: &DeclarationKind) -> MockType {
        self.symbol(*symbol).ty.clone()
    }

    fn properties_of_type(&self, ty: &MockType) -> Vec<usize> {
        match ty {
            MockType::Object(props) => props.clone(),
            _ => Vec::new(),
        }
    }

    fn union_members(&self, ty: &MockType) -> Option<Vec<MockType>> {
        match ty {
            MockType::Union(members) => Some(members.clone()),
            _ => None,
        }
    }

    fn intersection_members(&self, ty: &MockType) -> Option<Vec<MockType>> {
        match ty {
            MockType::Intersection(members) => Some(members.clone()),
            _ => None,
        }
    }

    fn string_literal_value(&self, ty: &MockType) -> Option<String> {
        match ty {
            MockType::StringLiteral(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn type_to_string(&self, ty: &MockType) -> String {
        match ty {
            MockType::Named(name) => name.clone(),
            MockType::StringLiteral(value) => format!("\"{}\"", value),
            MockType::Union(members) => join_types(self, members, " | "),
            MockType::Intersection(members) => join_types(self, members, " & "),
            MockType::Object(props) => {
                let names: Vec<_> = props.iter().map(|p| self.symbol_name(p)).collect();
                format!("{{ {} }}", names.join("; "))
            }
        }
    }
}

fn join_types(checker: &MockChecker, types: &[MockType], separator: &str) -> String {
    types
        .iter()
        .map(|t| checker.type_to_string(t))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Create a required `string` prop with a description
pub fn mock_prop(name: &str, description: &str) -> PropItem {
    PropItem {
        name: name.to_string(),
        required: true,
        ty: TypeDescriptor::named("string"),
        description: description.to_string(),
        default_value: DefaultValue::default(),
        tags: TagMap::new(),
    }
}

/// Create a component document holding `props`
pub fn mock_component_doc(export_name: &str, props: Vec<PropItem>) -> ComponentDoc {
    let props: PropMap = props.into_iter().map(|p| (p.name.clone(), p)).collect();
    ComponentDoc {
        export_name: export_name.to_string(),
        props,
        ..ComponentDoc::default()
    }
}

/// Build a program from in-memory `(path, source)` pairs, all of them roots
pub fn program_from_sources(
    sources: &[(&str, &str)],
    options: CompilerOptions,
) -> DocResult<Program> {
    sources
        .iter()
        .fold(Program::builder().options(options), |builder, (path, source)| {
            builder.overlay(path, *source).root(path)
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_prop() {
        let prop = mock_prop("label", "Label text");
        assert!(prop.required);
        assert_eq!(prop.ty.name, "string");
        assert!(prop.default_value.value.is_none());
    }

    #[test]
    fn test_mock_checker_module() {
        let mut checker = MockChecker::new();
        let props = checker.add(MockSymbol::new("Props").with_kind(DeclarationKind::Interface));
        checker.add_module("/src/a.ts", vec![props]);

        let module = checker.module_symbol(Path::new("/src/a.ts")).unwrap();
        assert_eq!(checker.exports_of_module(&module), vec![props]);
        assert_eq!(
            checker.declarations(&props),
            vec![DeclarationKind::Interface]
        );
    }

    #[test]
    fn test_program_from_sources() {
        let program = program_from_sources(
            &[("/src/a.ts", "export interface A {}")],
            CompilerOptions::default(),
        )
        .unwrap();
        assert!(program.module_symbol(Path::new("/src/a.ts")).is_some());
    }
}
