//! prop-etch: print component prop documentation as JSON.
//!
//! `prop-etch --tsconfig tsconfig.json --extract-enums src/button.ts`
//!
//! Logging goes to stderr and is controlled by `PROP_ETCH_LOG`
//! (for example `PROP_ETCH_LOG=prop_etch=debug`).

use anyhow::{Context, Result};
use clap::Parser;
use prop_etch::{ComponentDoc, DocParser, ParserOptions, SkipNames, StaticPropFilter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "prop-etch",
    version,
    about = "Extract component prop documentation from TypeScript sources"
)]
struct Cli {
    /// Source files to document
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// tsconfig.json providing compiler options
    #[arg(long)]
    tsconfig: Option<PathBuf>,

    /// Options file (TOML or JSON) with propFilter and enum settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render string-literal unions as enums
    #[arg(long)]
    extract_enums: bool,

    /// Skip props with this name. Can be specified multiple times.
    #[arg(long = "skip-prop", value_name = "NAME")]
    skip_props: Vec<String>,

    /// Skip props without a description
    #[arg(long)]
    skip_undocumented: bool,

    /// Print JSON on one line
    #[arg(long)]
    compact: bool,
}

impl Cli {
    /// Parser options from the options file, overridden by flags
    fn parser_options(&self) -> Result<ParserOptions> {
        let mut options = match &self.config {
            Some(path) => ParserOptions::from_file(path)
                .with_context(|| format!("failed to load options from {}", path.display()))?,
            None => ParserOptions::new(),
        };

        if self.extract_enums {
            options = options.extract_literal_values_from_enum(true);
        }

        if !self.skip_props.is_empty() || self.skip_undocumented {
            let mut rule = StaticPropFilter::default();
            if !self.skip_props.is_empty() {
                rule = rule.skip_names(SkipNames::Many(self.skip_props.clone()));
            }
            if self.skip_undocumented {
                rule = rule.skip_undocumented();
            }
            options = options.with_prop_filter(rule);
        }

        Ok(options)
    }

    fn doc_parser(&self) -> Result<DocParser> {
        let options = self.parser_options()?;
        match &self.tsconfig {
            Some(path) => DocParser::with_custom_config(path, options)
                .with_context(|| format!("failed to load {}", path.display())),
            None => Ok(DocParser::with_default_config(options)),
        }
    }

    fn render(&self, docs: &[ComponentDoc]) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(docs)
        } else {
            serde_json::to_string_pretty(docs)
        };
        json.context("failed to serialize documentation")
    }
}

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_env("PROP_ETCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let parser = cli.doc_parser()?;

    let docs = parser
        .parse(&cli.files)
        .context("failed to extract documentation")?;
    tracing::debug!(documents = docs.len(), "extraction finished");

    println!("{}", cli.render(&docs)?);
    Ok(())
}
