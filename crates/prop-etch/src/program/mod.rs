//! Bundled declaration-level analysis engine
//!
//! [`Program`] parses TypeScript sources with deno_ast, lowers them into an
//! owned declaration model and answers [`TypeChecker`] queries over it.
//! It is not a full type checker: types are kept as written, references are
//! resolved by name through local declarations, imports and re-exports, and
//! a property's type comes from its annotation or its literal initializer.

pub mod config;
pub mod lower;
pub mod model;
pub mod resolve;
pub mod source;
pub mod types;

pub use config::CompilerOptions;
pub use model::FileId;
pub use types::TsType;

use crate::checker::{DeclarationKind, SymbolFlags, TypeChecker};
use crate::diagnostics::{DocError, DocResult};
use crate::js_doc::JsDocTagInfo;
use indexmap::IndexSet;
use model::{Decl, DeclKind, ImportBinding, Initializer, Member, MemberKind, SourceModule};
use resolve::{absolute_path, resolve_specifier};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use types::{Keyword, LiteralType};

/// Bound on alias chains, re-export hops and inheritance depth
const MAX_DEPTH: usize = 32;

/// A local declaration group: every declaration of `name` in `file`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclRef {
    pub file: FileId,
    pub name: String,
}

/// Symbol handle
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A source file with module syntax
    Module(FileId),
    /// An exported name and the declarations it resolves to
    Export {
        module: FileId,
        name: String,
        target: Option<DeclRef>,
    },
    /// A property, method or accessor of some type
    Member { file: FileId, member: Arc<Member> },
}

/// Type handle: a written type and the file its names resolve in
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub file: FileId,
    pub ty: TsType,
}

/// Declaration handle
#[derive(Debug, Clone)]
pub enum Declaration {
    Item { file: FileId, decl: Arc<Decl> },
    Member { file: FileId, member: Arc<Member> },
    /// Target of a re-export that could not be followed
    Unresolved,
}

/// A loaded set of source files
#[derive(Debug)]
pub struct Program {
    files: Vec<SourceModule>,
    by_path: HashMap<PathBuf, FileId>,
    options: CompilerOptions,
}

/// Builder for [`Program`]
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    roots: Vec<PathBuf>,
    overlays: HashMap<PathBuf, Arc<str>>,
    options: CompilerOptions,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root file
    pub fn root(mut self, path: impl AsRef<Path>) -> Self {
        self.roots.push(path.as_ref().to_path_buf());
        self
    }

    /// Add several root files
    pub fn roots<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.roots
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Serve `path` from memory instead of disk
    pub fn overlay(mut self, path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        let source: String = source.into();
        self.overlays
            .insert(absolute_path(path.as_ref()), Arc::from(source));
        self
    }

    pub fn options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Load the roots and every file they reach through relative specifiers
    pub fn build(self) -> DocResult<Program> {
        let mut files: Vec<SourceModule> = Vec::new();
        let mut by_path: HashMap<PathBuf, FileId> = HashMap::new();

        for root in &self.roots {
            let path = absolute_path(root);
            if by_path.contains_key(&path) {
                continue;
            }
            let module = self.load(&path)?;
            by_path.insert(path, files.len());
            files.push(module);
        }

        let mut next = 0;
        while next < files.len() {
            let from = files[next].path.clone();
            let specifiers = files[next].specifiers.clone();

            for specifier in specifiers {
                let Some(target) =
                    resolve_specifier(&from, &specifier, &self.options, |p| self.exists(p))
                else {
                    tracing::debug!(
                        file = %from.display(),
                        specifier = %specifier,
                        "module specifier not resolved"
                    );
                    continue;
                };

                let id = match by_path.get(&target) {
                    Some(id) => *id,
                    None => {
                        let module = match self.load(&target) {
                            Ok(module) => module,
                            Err(err) => {
                                tracing::warn!(
                                    file = %target.display(),
                                    error = %err,
                                    "skipping dependency"
                                );
                                SourceModule::new(&target)
                            }
                        };
                        let id = files.len();
                        by_path.insert(target, id);
                        files.push(module);
                        id
                    }
                };
                files[next].resolved.insert(specifier, id);
            }
            next += 1;
        }

        Ok(Program {
            files,
            by_path,
            options: self.options,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.overlays.contains_key(path) || path.is_file()
    }

    fn load(&self, path: &Path) -> DocResult<SourceModule> {
        let text: Arc<str> = match self.overlays.get(path) {
            Some(text) => text.clone(),
            None => {
                if !path.is_file() {
                    return Err(DocError::FileNotFound(path.to_path_buf()));
                }
                Arc::from(std::fs::read_to_string(path)?)
            }
        };

        let parsed = source::parse_typescript_source(path, text)?;
        let module = lower::lower_module(&parsed);
        tracing::debug!(
            file = %path.display(),
            declarations = module.declarations.len(),
            exports = module.exports.len(),
            "parsed source file"
        );
        Ok(module)
    }
}

impl Program {
    /// Load `files` from disk
    pub fn new<P: AsRef<Path>>(files: &[P], options: CompilerOptions) -> DocResult<Self> {
        ProgramBuilder::new().options(options).roots(files).build()
    }

    pub fn builder() -> ProgramBuilder {
        ProgramBuilder::new()
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Id of a loaded file
    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(&absolute_path(path)).copied()
    }

    /// Lowered model of a loaded file
    pub fn source(&self, id: FileId) -> Option<&SourceModule> {
        self.files.get(id)
    }

    /// Paths of every loaded file, roots first
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    fn target(&self, file: FileId, specifier: &str) -> Option<FileId> {
        self.files.get(file)?.resolved.get(specifier).copied()
    }

    fn decls(&self, r: &DeclRef) -> &[Arc<Decl>] {
        self.files
            .get(r.file)
            .and_then(|f| f.declarations.get(&r.name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Follow an exported name to its declarations
    fn resolve_export(&self, file: FileId, name: &str, depth: usize) -> Option<DeclRef> {
        if depth > MAX_DEPTH {
            return None;
        }
        let module = self.files.get(file)?;

        if let Some(entry) = module.exports.iter().find(|e| e.exported() == name) {
            return match entry {
                model::ExportEntry::Local { local, .. } => {
                    self.resolve_local(file, local, depth + 1)
                }
                model::ExportEntry::From {
                    specifier,
                    imported,
                    ..
                } => self.resolve_export(self.target(file, specifier)?, imported, depth + 1),
                model::ExportEntry::Namespace { .. } => None,
            };
        }

        if name == "default" {
            return None;
        }
        module
            .star_exports
            .iter()
            .filter_map(|specifier| self.target(file, specifier))
            .find_map(|target| self.resolve_export(target, name, depth + 1))
    }

    /// Follow a name in a file's scope to its declarations
    fn resolve_local(&self, file: FileId, name: &str, depth: usize) -> Option<DeclRef> {
        let module = self.files.get(file)?;
        if module.declarations.contains_key(name) {
            return Some(DeclRef {
                file,
                name: name.to_string(),
            });
        }

        match module.imports.get(name)? {
            ImportBinding::Named {
                specifier,
                imported,
            } => self.resolve_export(self.target(file, specifier)?, imported, depth + 1),
            ImportBinding::Namespace { .. } => None,
        }
    }

    /// Resolve a type reference name, `ns.Name` through namespace imports
    fn resolve_type_name(&self, file: FileId, name: &str) -> Option<DeclRef> {
        match name.split_once('.') {
            None => self.resolve_local(file, name, 0),
            Some((head, rest)) if !rest.contains('.') => {
                match self.files.get(file)?.imports.get(head)? {
                    ImportBinding::Namespace { specifier } => {
                        self.resolve_export(self.target(file, specifier)?, rest, 0)
                    }
                    ImportBinding::Named { .. } => None,
                }
            }
            Some(_) => None,
        }
    }

    /// Exported names of a module, own entries first, then star re-exports
    fn export_names(
        &self,
        file: FileId,
        include_default: bool,
        visited: &mut HashSet<FileId>,
        out: &mut IndexSet<String>,
    ) {
        if !visited.insert(file) || visited.len() > MAX_DEPTH {
            return;
        }
        let Some(module) = self.files.get(file) else {
            return;
        };

        for entry in &module.exports {
            let name = entry.exported();
            if include_default || name != "default" {
                out.insert(name.to_string());
            }
        }
        for specifier in &module.star_exports {
            if let Some(target) = self.target(file, specifier) {
                self.export_names(target, false, visited, out);
            }
        }
    }

    /// Replace alias references by the aliased type
    fn look_through(&self, ty: &Type) -> Type {
        let mut current = ty.clone();
        for _ in 0..MAX_DEPTH {
            let TsType::Reference { name, .. } = &current.ty else {
                break;
            };
            let Some(r) = self.resolve_type_name(current.file, name) else {
                break;
            };
            let Some(aliased) = self.decls(&r).iter().find_map(|d| match &d.kind {
                DeclKind::TypeAlias { ty } => Some(ty.clone()),
                _ => None,
            }) else {
                break;
            };
            current = Type {
                file: r.file,
                ty: aliased,
            };
        }
        current
    }

    fn flatten_union(&self, ty: &Type, out: &mut Vec<Type>, depth: usize) {
        let resolved = self.look_through(ty);
        match &resolved.ty {
            TsType::Union(members) if depth < MAX_DEPTH => {
                for member in members {
                    let member = Type {
                        file: resolved.file,
                        ty: member.clone(),
                    };
                    self.flatten_union(&member, out, depth + 1);
                }
            }
            _ => out.push(ty.clone()),
        }
    }

    /// Members of a written type, own before inherited, first name wins
    fn members_of(&self, file: FileId, ty: &TsType, depth: usize) -> Vec<(FileId, Arc<Member>)> {
        if depth > MAX_DEPTH {
            return Vec::new();
        }

        match ty {
            TsType::Reference { name, type_args } => match self.resolve_type_name(file, name) {
                Some(r) => self.members_of_decls(&r, depth),
                None => self.utility_members(file, name, type_args, depth),
            },
            TsType::TypeLiteral(members) => members.iter().map(|m| (file, m.clone())).collect(),
            TsType::Intersection(types) => unique_members(
                types
                    .iter()
                    .flat_map(|t| self.members_of(file, t, depth + 1))
                    .collect(),
            ),
            TsType::Union(types) => {
                let null_checks = self.options.null_checks();
                let mut sets = types
                    .iter()
                    .filter(|t| null_checks || !t.is_nullish())
                    .map(|t| self.members_of(file, t, depth + 1));
                let Some(first) = sets.next() else {
                    return Vec::new();
                };
                let rest: Vec<_> = sets.collect();
                first
                    .into_iter()
                    .filter(|(_, m)| {
                        rest.iter()
                            .all(|set| set.iter().any(|(_, other)| other.name == m.name))
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn members_of_decls(&self, r: &DeclRef, depth: usize) -> Vec<(FileId, Arc<Member>)> {
        let decls = self.decls(r);
        let mut out = Vec::new();

        for decl in decls {
            match &decl.kind {
                DeclKind::Interface { members, .. } | DeclKind::Class { members, .. } => {
                    out.extend(members.iter().map(|m| (r.file, m.clone())));
                }
                DeclKind::TypeAlias { ty } => out.extend(self.members_of(r.file, ty, depth + 1)),
                _ => {}
            }
        }

        for decl in decls {
            match &decl.kind {
                DeclKind::Interface { extends, .. } => {
                    for base in extends {
                        out.extend(self.members_of(r.file, base, depth + 1));
                    }
                }
                DeclKind::Class {
                    extends: Some(base),
                    ..
                } => out.extend(self.members_of(r.file, base, depth + 1)),
                _ => {}
            }
        }

        unique_members(out)
    }

    /// `Partial`, `Required`, `Readonly`, `Pick` and `Omit` over object types
    fn utility_members(
        &self,
        file: FileId,
        name: &str,
        type_args: &[TsType],
        depth: usize,
    ) -> Vec<(FileId, Arc<Member>)> {
        let base = || {
            type_args
                .first()
                .map(|t| self.members_of(file, t, depth + 1))
                .unwrap_or_default()
        };
        let modify = |update: fn(&mut Member)| -> Vec<(FileId, Arc<Member>)> {
            base()
                .into_iter()
                .map(|(f, m)| {
                    let mut member = Member::clone(&m);
                    update(&mut member);
                    (f, Arc::new(member))
                })
                .collect()
        };

        match name {
            "Partial" => modify(|m| m.optional = true),
            "Required" => modify(|m| m.optional = false),
            "Readonly" => modify(|m| m.readonly = true),
            "Pick" | "Omit" => {
                let Some(keys) = type_args.get(1).and_then(|k| self.literal_keys(file, k)) else {
                    return Vec::new();
                };
                let pick = name == "Pick";
                base()
                    .into_iter()
                    .filter(|(_, m)| keys.contains(&m.name) == pick)
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn literal_keys(&self, file: FileId, ty: &TsType) -> Option<Vec<String>> {
        let ty = Type {
            file,
            ty: ty.clone(),
        };
        if let Some(key) = self.string_literal_value(&ty) {
            return Some(vec![key]);
        }
        self.union_members(&ty)?
            .iter()
            .map(|member| self.string_literal_value(member))
            .collect()
    }

    /// Type of a member as seen by a reader of the declaring type
    fn member_type(&self, file: FileId, member: &Member) -> Type {
        let null_checks = self.options.null_checks();
        let declared = match (&member.ty, &member.initializer) {
            (Some(ty), _) => ty.clone(),
            (None, Some(initializer)) => infer_type(initializer, member.readonly, null_checks),
            (None, None) => TsType::any(),
        };

        let ty = if !null_checks {
            strip_nullish(declared)
        } else if member.optional {
            with_undefined(declared)
        } else {
            declared
        };
        Type { file, ty }
    }
}

fn unique_members(members: Vec<(FileId, Arc<Member>)>) -> Vec<(FileId, Arc<Member>)> {
    let mut seen = HashSet::new();
    members
        .into_iter()
        .filter(|(_, m)| seen.insert(m.name.clone()))
        .collect()
}

/// Type of an unannotated property from its initializer
fn infer_type(initializer: &Initializer, readonly: bool, null_checks: bool) -> TsType {
    let keyword = TsType::Keyword;
    match initializer {
        Initializer::Boolean(b) if readonly => TsType::Literal(LiteralType::Boolean(*b)),
        Initializer::Boolean(_) => keyword(Keyword::Boolean),
        Initializer::Number(n) if readonly => TsType::Literal(LiteralType::Number(*n)),
        Initializer::Number(_) => keyword(Keyword::Number),
        Initializer::String(s) if readonly => TsType::string_literal(s.clone()),
        Initializer::String(_) | Initializer::Template => keyword(Keyword::String),
        Initializer::BigInt(digits) if readonly => TsType::Literal(LiteralType::BigInt(digits.clone())),
        Initializer::BigInt(_) => keyword(Keyword::BigInt),
        Initializer::Null if null_checks => keyword(Keyword::Null),
        Initializer::Undefined if null_checks => keyword(Keyword::Undefined),
        Initializer::Array if null_checks => TsType::Array(Box::new(keyword(Keyword::Never))),
        Initializer::Array => TsType::Array(Box::new(TsType::any())),
        Initializer::EmptyObject => TsType::TypeLiteral(Vec::new()),
        Initializer::New(name) => TsType::reference(name.clone()),
        Initializer::Typed(ty) => ty.clone(),
        Initializer::Null | Initializer::Undefined | Initializer::Other => TsType::any(),
    }
}

/// Drop `null` and `undefined` from a union, as non-strict checking does
fn strip_nullish(ty: TsType) -> TsType {
    match ty {
        TsType::Union(types) => {
            let mut kept: Vec<TsType> = types.iter().filter(|t| !t.is_nullish()).cloned().collect();
            match kept.len() {
                0 => TsType::Union(types),
                1 => kept.remove(0),
                _ => TsType::Union(kept),
            }
        }
        other => other,
    }
}

/// Append `undefined` to the type of an optional property
fn with_undefined(ty: TsType) -> TsType {
    let undefined = TsType::undefined();
    match ty {
        TsType::Keyword(Keyword::Any) | TsType::Keyword(Keyword::Unknown) => ty,
        TsType::Union(mut types) => {
            if !types.contains(&undefined) {
                types.push(undefined);
            }
            TsType::Union(types)
        }
        other if other == undefined => other,
        other => TsType::Union(vec![other, undefined]),
    }
}

impl TypeChecker for Program {
    type Symbol = Symbol;
    type Type = Type;
    type Declaration = Declaration;

    fn module_symbol(&self, file: &Path) -> Option<Symbol> {
        let id = self.file_id(file)?;
        self.files[id].is_module.then_some(Symbol::Module(id))
    }

    fn exports_of_module(&self, module: &Symbol) -> Vec<Symbol> {
        let Symbol::Module(file) = module else {
            return Vec::new();
        };

        let mut names = IndexSet::new();
        self.export_names(*file, true, &mut HashSet::new(), &mut names);

        names
            .into_iter()
            .map(|name| Symbol::Export {
                module: *file,
                target: self.resolve_export(*file, &name, 0),
                name,
            })
            .collect()
    }

    fn symbol_name(&self, symbol: &Symbol) -> String {
        match symbol {
            Symbol::Module(file) => self
                .files
                .get(*file)
                .map(|f| format!("\"{}\"", f.path.with_extension("").display()))
                .unwrap_or_default(),
            Symbol::Export { name, .. } => name.clone(),
            Symbol::Member { member, .. } => member.name.clone(),
        }
    }

    fn declarations(&self, symbol: &Symbol) -> Vec<Declaration> {
        match symbol {
            Symbol::Module(_) => Vec::new(),
            Symbol::Export {
                target: Some(r), ..
            } => self
                .decls(r)
                .iter()
                .map(|decl| Declaration::Item {
                    file: r.file,
                    decl: decl.clone(),
                })
                .collect(),
            Symbol::Export { target: None, .. } => vec![Declaration::Unresolved],
            Symbol::Member { file, member } => vec![Declaration::Member {
                file: *file,
                member: member.clone(),
            }],
        }
    }

    fn declaration_kind(&self, declaration: &Declaration) -> DeclarationKind {
        match declaration {
            Declaration::Item { decl, .. } => decl.declaration_kind(),
            Declaration::Member { .. } | Declaration::Unresolved => DeclarationKind::Other,
        }
    }

    fn value_declaration(&self, symbol: &Symbol) -> Option<Declaration> {
        match symbol {
            Symbol::Module(_) => None,
            Symbol::Export { target, .. } => {
                let r = target.as_ref()?;
                self.decls(r)
                    .iter()
                    .find(|decl| decl.has_value())
                    .map(|decl| Declaration::Item {
                        file: r.file,
                        decl: decl.clone(),
                    })
            }
            Symbol::Member { file, member } => Some(Declaration::Member {
                file: *file,
                member: member.clone(),
            }),
        }
    }

    fn documentation_comment(&self, symbol: &Symbol) -> Option<String> {
        match symbol {
            Symbol::Module(_) => None,
            Symbol::Export { target, .. } => Some(
                target
                    .as_ref()
                    .and_then(|r| {
                        self.decls(r)
                            .iter()
                            .map(|decl| decl.doc.description.as_str())
                            .find(|d| !d.is_empty())
                    })
                    .unwrap_or_default()
                    .to_string(),
            ),
            Symbol::Member { member, .. } => Some(member.doc.description.clone()),
        }
    }

    fn jsdoc_tags(&self, symbol: &Symbol) -> Vec<JsDocTagInfo> {
        match symbol {
            Symbol::Module(_) | Symbol::Export { target: None, .. } => Vec::new(),
            Symbol::Export {
                target: Some(r), ..
            } => self
                .decls(r)
                .iter()
                .flat_map(|decl| decl.doc.tags.iter().cloned())
                .collect(),
            Symbol::Member { member, .. } => member.doc.tags.clone(),
        }
    }

    fn declared_type_of_symbol(&self, symbol: &Symbol) -> Type {
        match symbol {
            Symbol::Module(file) => Type {
                file: *file,
                ty: TsType::any(),
            },
            Symbol::Export {
                target: Some(r), ..
            } => Type {
                file: r.file,
                ty: TsType::reference(r.name.clone()),
            },
            Symbol::Export {
                module,
                target: None,
                ..
            } => Type {
                file: *module,
                ty: TsType::any(),
            },
            Symbol::Member { file, member } => self.member_type(*file, member),
        }
    }

    fn symbol_flags(&self, symbol: &Symbol) -> SymbolFlags {
        let Symbol::Member { member, .. } = symbol else {
            return SymbolFlags::default();
        };
        let flags = match member.kind {
            MemberKind::Property => SymbolFlags::property(),
            MemberKind::Method => SymbolFlags::method(),
            MemberKind::Getter | MemberKind::Setter => SymbolFlags {
                accessor: true,
                ..SymbolFlags::default()
            },
        };
        if member.optional {
            flags.as_optional()
        } else {
            flags
        }
    }

    fn type_of_symbol_at_location(&self, symbol: &Symbol, declaration: &Declaration) -> Type {
        match (symbol, declaration) {
            (_, Declaration::Member { file, member }) => self.member_type(*file, member),
            _ => self.declared_type_of_symbol(symbol),
        }
    }

    fn properties_of_type(&self, ty: &Type) -> Vec<Symbol> {
        self.members_of(ty.file, &ty.ty, 0)
            .into_iter()
            .map(|(file, member)| Symbol::Member { file, member })
            .collect()
    }

    fn union_members(&self, ty: &Type) -> Option<Vec<Type>> {
        let resolved = self.look_through(ty);
        let TsType::Union(_) = &resolved.ty else {
            return None;
        };
        let mut out = Vec::new();
        self.flatten_union(&resolved, &mut out, 0);
        Some(out)
    }

    fn intersection_members(&self, ty: &Type) -> Option<Vec<Type>> {
        let resolved = self.look_through(ty);
        match resolved.ty {
            TsType::Intersection(types) => Some(
                types
                    .into_iter()
                    .map(|ty| Type {
                        file: resolved.file,
                        ty,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    fn string_literal_value(&self, ty: &Type) -> Option<String> {
        match self.look_through(ty).ty {
            TsType::Literal(LiteralType::String(value)) => Some(value),
            _ => None,
        }
    }

    fn type_to_string(&self, ty: &Type) -> String {
        ty.ty.to_string()
    }
}
