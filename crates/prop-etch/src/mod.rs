//! prop-etch: component prop documentation from TypeScript sources
//!
//! This crate extracts documentation for UI component contracts by:
//! - Parsing TypeScript source files using deno_ast/SWC
//! - Finding exported interfaces, type aliases and classes
//! - Collecting their props with types, JSDoc descriptions and tags
//! - Filtering props by a predicate or by declarative rules
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │ *.ts / *.tsx    │    │ tsconfig.json    │
//! │ (SWC parse)     │    │ (compilerOptions)│
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!              ┌──────────────┐
//!              │   Program    │  impl TypeChecker
//!              └──────┬───────┘
//!                     │
//!                     ▼
//!              ┌──────────────┐
//!              │  DocParser   │  exports → props → filter
//!              └──────┬───────┘
//!                     ▼
//!              Vec<ComponentDoc>
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use prop_etch::{parse, ParserOptions, StaticPropFilter};
//!
//! let options = ParserOptions::new()
//!     .with_prop_filter(StaticPropFilter::default().skip_undocumented())
//!     .extract_literal_values_from_enum(true);
//!
//! let docs = parse(&["src/components/button.ts"], &options)?;
//! for doc in &docs {
//!     println!("{}: {} props", doc.export_name, doc.props.len());
//! }
//! # Ok::<(), prop_etch::DocError>(())
//! ```

// Engine interface and the bundled engine
pub mod checker;
pub mod program;

// JSDoc
pub mod comment;
pub mod js_doc;
pub mod tags;

// Extraction pipeline
pub mod filter;
pub mod options;
pub mod parser;
pub mod prop_type;
pub mod props;

pub mod diagnostics;
pub mod test;

// Re-exports for convenience
pub use checker::{DeclarationKind, SymbolFlags, TypeChecker};
pub use comment::{extract_comment, CommentDoc};
pub use diagnostics::{DocError, DocResult};
pub use filter::{Component, PropFilter};
pub use js_doc::{JsDoc, JsDocTagInfo, TagText};
pub use options::{ParserOptions, PropFilterConfig, PropPredicate, SkipNames, StaticPropFilter};
pub use parser::{dedupe_by_export_name, parse, ComponentDoc, DocParser, Method};
pub use program::{CompilerOptions, Program, ProgramBuilder};
pub use prop_type::{extract_type, EnumValue, TypeDescriptor};
pub use props::{collect_props, DefaultValue, PropItem, PropMap};
pub use tags::{format_tag, TagMap, TagValue};
