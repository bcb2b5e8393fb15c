//! Documentation assembler
//!
//! Walks the exports of every input file, keeps the ones declared as an
//! interface, type alias or class, and turns each into a [`ComponentDoc`].
//!
//! ```no_run
//! use prop_etch::{DocParser, ParserOptions};
//!
//! let parser = DocParser::with_custom_config("tsconfig.json", ParserOptions::new())?;
//! let docs = parser.parse(&["src/button.ts"])?;
//! println!("{}", serde_json::to_string_pretty(&docs)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::checker::TypeChecker;
use crate::comment::extract_comment;
use crate::diagnostics::DocResult;
use crate::filter::{Component, PropFilter};
use crate::options::ParserOptions;
use crate::program::{CompilerOptions, Program};
use crate::props::{collect_props, PropMap};
use crate::tags::TagMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Documentation of one exported component contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDoc {
    /// Exported name, the document's identity
    pub export_name: String,
    pub description: String,
    pub props: PropMap,
    /// Reserved; extraction never fills it
    pub methods: Vec<Method>,
    pub tags: TagMap,
}

/// Method documentation slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    pub description: String,
}

/// Parse `files` with default compiler options
pub fn parse<P: AsRef<Path>>(files: &[P], options: &ParserOptions) -> DocResult<Vec<ComponentDoc>> {
    DocParser::with_default_config(options.clone()).parse(files)
}

/// Extraction entry point holding compiler and parser options
#[derive(Debug, Clone)]
pub struct DocParser {
    compiler_options: CompilerOptions,
    options: ParserOptions,
    filter: PropFilter,
}

impl DocParser {
    pub fn with_default_config(options: ParserOptions) -> Self {
        Self::with_compiler_options(CompilerOptions::default(), options)
    }

    pub fn with_compiler_options(compiler_options: CompilerOptions, options: ParserOptions) -> Self {
        let filter = PropFilter::new(&options);
        Self {
            compiler_options,
            options,
            filter,
        }
    }

    /// Read compiler options from a `tsconfig.json`
    pub fn with_custom_config(
        tsconfig: impl AsRef<Path>,
        options: ParserOptions,
    ) -> DocResult<Self> {
        let compiler_options = CompilerOptions::from_tsconfig(tsconfig)?;
        Ok(Self::with_compiler_options(compiler_options, options))
    }

    pub fn compiler_options(&self) -> &CompilerOptions {
        &self.compiler_options
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Build a fresh program over `files` and extract their components
    pub fn parse<P: AsRef<Path>>(&self, files: &[P]) -> DocResult<Vec<ComponentDoc>> {
        let program = Program::new(files, self.compiler_options.clone())?;
        Ok(self.parse_with_checker(&program, files))
    }

    /// Extract components using an engine the caller owns
    pub fn parse_with_checker<C, P>(&self, checker: &C, files: &[P]) -> Vec<ComponentDoc>
    where
        C: TypeChecker,
        P: AsRef<Path>,
    {
        let docs = files
            .iter()
            .flat_map(|file| self.parse_file(checker, file.as_ref()))
            .collect();
        dedupe_by_export_name(docs)
    }

    fn parse_file<C: TypeChecker>(&self, checker: &C, file: &Path) -> Vec<ComponentDoc> {
        let Some(module) = checker.module_symbol(file) else {
            tracing::debug!(file = %file.display(), "no module symbol, skipping file");
            return Vec::new();
        };

        checker
            .exports_of_module(&module)
            .iter()
            .filter_map(|export| self.component_doc(checker, export))
            .collect()
    }

    fn component_doc<C: TypeChecker>(&self, checker: &C, export: &C::Symbol) -> Option<ComponentDoc> {
        let export_name = checker.symbol_name(export);
        let kind = checker
            .declarations(export)
            .first()
            .map(|decl| checker.declaration_kind(decl));

        if !kind.is_some_and(|k| k.is_component_contract()) {
            tracing::debug!(export = %export_name, ?kind, "export is not a component contract");
            return None;
        }

        let comment = extract_comment(checker, export);
        let mut props = collect_props(
            checker,
            export,
            self.options.should_extract_literal_values_from_enum,
        );

        let component = Component::new(export_name.clone());
        props.retain(|name, prop| {
            let keep = self.filter.keep(prop, &component);
            if !keep {
                tracing::debug!(component = %component.name, prop = %name, "prop filtered out");
            }
            keep
        });

        Some(ComponentDoc {
            export_name,
            description: comment.description,
            props,
            methods: Vec::new(),
            tags: comment.tags,
        })
    }
}

/// Keep the first document for every export name
pub fn dedupe_by_export_name(docs: Vec<ComponentDoc>) -> Vec<ComponentDoc> {
    let mut seen = HashSet::new();
    docs.into_iter()
        .filter(|doc| {
            let first = seen.insert(doc.export_name.clone());
            if !first {
                tracing::debug!(export = %doc.export_name, "dropping duplicate document");
            }
            first
        })
        .collect()
}
