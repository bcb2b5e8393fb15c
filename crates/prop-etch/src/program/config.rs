//! Compiler configuration
//!
//! Only the handful of `compilerOptions` that change extraction results are
//! read from a `tsconfig.json`; everything else in the file is ignored.

use crate::diagnostics::{DocError, DocResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::resolve::{absolute_path, normalize_path};

/// Options that influence how the program resolves and types sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub strict: bool,
    /// Explicit `strictNullChecks`; `None` follows `strict`
    pub strict_null_checks: Option<bool>,
    /// Absolute `baseUrl` for bare specifiers
    pub base_url: Option<PathBuf>,
    pub allow_js: bool,
}

impl CompilerOptions {
    /// Options with `strict: true`
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Effective `strictNullChecks`
    pub fn null_checks(&self) -> bool {
        self.strict_null_checks.unwrap_or(self.strict)
    }

    /// Load options from a `tsconfig.json`, following relative `extends`
    pub fn from_tsconfig(path: impl AsRef<Path>) -> DocResult<Self> {
        let path = absolute_path(path.as_ref());
        let raw = load_chain(&path, &mut Vec::new())?;

        Ok(Self {
            strict: raw.strict.unwrap_or(false),
            strict_null_checks: raw.strict_null_checks,
            base_url: raw.base_url,
            allow_js: raw.allow_js.unwrap_or(false),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigFile {
    extends: Option<String>,
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    strict: Option<bool>,
    strict_null_checks: Option<bool>,
    allow_js: Option<bool>,
    base_url: Option<String>,
}

/// Options merged along an `extends` chain
#[derive(Debug, Default)]
struct MergedOptions {
    strict: Option<bool>,
    strict_null_checks: Option<bool>,
    allow_js: Option<bool>,
    base_url: Option<PathBuf>,
}

fn load_chain(path: &Path, visited: &mut Vec<PathBuf>) -> DocResult<MergedOptions> {
    if visited.iter().any(|p| p == path) {
        return Err(DocError::config(path, "circular `extends` chain"));
    }
    visited.push(path.to_path_buf());

    let text = std::fs::read_to_string(path).map_err(|e| DocError::config(path, e.to_string()))?;
    let file: TsConfigFile = serde_json::from_str(&strip_jsonc(&text))
        .map_err(|e| DocError::config(path, e.to_string()))?;
    let dir = path.parent().unwrap_or(Path::new("/"));

    let parent = match file.extends.as_deref() {
        Some(extends) if extends.starts_with("./") || extends.starts_with("../") => {
            let mut target = normalize_path(&dir.join(extends));
            if target.extension().is_none() {
                target.set_extension("json");
            }
            load_chain(&target, visited)?
        }
        Some(extends) => {
            tracing::debug!(config = %path.display(), extends, "ignoring non-relative extends");
            MergedOptions::default()
        }
        None => MergedOptions::default(),
    };

    let own = file.compiler_options;
    Ok(MergedOptions {
        strict: own.strict.or(parent.strict),
        strict_null_checks: own.strict_null_checks.or(parent.strict_null_checks),
        allow_js: own.allow_js.or(parent.allow_js),
        base_url: own
            .base_url
            .map(|base| normalize_path(&dir.join(base)))
            .or(parent.base_url),
    })
}

/// Strip comments and trailing commas so `tsconfig.json` parses as JSON
fn strip_jsonc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    remove_trailing_commas(&out)
}

fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}
