//! Parser options
//!
//! Options arrive either programmatically or from an options file. Only the
//! declarative filter form can come from a file; a predicate filter has to
//! be supplied in code.

use crate::diagnostics::{DocError, DocResult};
use crate::filter::Component;
use crate::props::PropItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Predicate deciding whether a prop stays in the document
pub type PropPredicate = Arc<dyn Fn(&PropItem, &Component) -> bool + Send + Sync>;

/// Prop names to skip, either one name or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkipNames {
    One(String),
    Many(Vec<String>),
}

impl SkipNames {
    /// Whether `name` is skipped
    pub fn contains(&self, name: &str) -> bool {
        match self {
            SkipNames::One(skipped) => skipped == name,
            SkipNames::Many(skipped) => skipped.iter().any(|s| s == name),
        }
    }
}

impl From<&str> for SkipNames {
    fn from(name: &str) -> Self {
        SkipNames::One(name.to_string())
    }
}

impl From<Vec<String>> for SkipNames {
    fn from(names: Vec<String>) -> Self {
        SkipNames::Many(names)
    }
}

/// Declarative prop filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPropFilter {
    /// Drop props with these names
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skip_props_with_name: Option<SkipNames>,
    /// Drop props without a description
    #[serde(default)]
    pub skip_props_without_doc: bool,
}

impl StaticPropFilter {
    /// Skip props with the given name(s)
    pub fn skip_names(mut self, names: impl Into<SkipNames>) -> Self {
        self.skip_props_with_name = Some(names.into());
        self
    }

    /// Skip props without a description
    pub fn skip_undocumented(mut self) -> Self {
        self.skip_props_without_doc = true;
        self
    }
}

/// Filter configuration, exactly one form per invocation
#[derive(Clone)]
pub enum PropFilterConfig {
    /// Caller-supplied predicate
    ByPredicate(PropPredicate),
    /// Declarative rules
    ByRule(StaticPropFilter),
}

impl PropFilterConfig {
    /// Wrap a closure as a predicate filter
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&PropItem, &Component) -> bool + Send + Sync + 'static,
    {
        PropFilterConfig::ByPredicate(Arc::new(f))
    }
}

impl fmt::Debug for PropFilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropFilterConfig::ByPredicate(_) => f.write_str("ByPredicate(<fn>)"),
            PropFilterConfig::ByRule(rule) => f.debug_tuple("ByRule").field(rule).finish(),
        }
    }
}

impl From<StaticPropFilter> for PropFilterConfig {
    fn from(rule: StaticPropFilter) -> Self {
        PropFilterConfig::ByRule(rule)
    }
}

/// Options for one extraction run
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Prop filter, every prop survives when absent
    pub prop_filter: Option<PropFilterConfig>,
    /// Render string-literal unions as enums
    pub should_extract_literal_values_from_enum: bool,
}

impl ParserOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prop filter
    pub fn with_prop_filter(mut self, filter: impl Into<PropFilterConfig>) -> Self {
        self.prop_filter = Some(filter.into());
        self
    }

    /// Filter props with a predicate
    pub fn with_predicate<F>(self, f: F) -> Self
    where
        F: Fn(&PropItem, &Component) -> bool + Send + Sync + 'static,
    {
        self.with_prop_filter(PropFilterConfig::predicate(f))
    }

    /// Enable or disable enum extraction
    pub fn extract_literal_values_from_enum(mut self, enable: bool) -> Self {
        self.should_extract_literal_values_from_enum = enable;
        self
    }

    /// Load declarative options from a TOML (`.toml`) or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> DocResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DocError::config(path, format!("cannot read options file: {}", e)))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let file: OptionsFile = if is_toml {
            toml::from_str(&text).map_err(|e| DocError::config(path, e.to_string()))?
        } else {
            serde_json::from_str(&text).map_err(|e| DocError::config(path, e.to_string()))?
        };

        Ok(file.into())
    }
}

/// On-disk shape of an options file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OptionsFile {
    #[serde(default)]
    should_extract_literal_values_from_enum: bool,
    #[serde(default)]
    prop_filter: Option<StaticPropFilter>,
}

impl From<OptionsFile> for ParserOptions {
    fn from(file: OptionsFile) -> Self {
        Self {
            prop_filter: file.prop_filter.map(PropFilterConfig::ByRule),
            should_extract_literal_values_from_enum: file.should_extract_literal_values_from_enum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn rule(options: &ParserOptions) -> &StaticPropFilter {
        match options.prop_filter.as_ref() {
            Some(PropFilterConfig::ByRule(rule)) => rule,
            other => panic!("expected rule filter, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_names_contains() {
        assert!(SkipNames::from("foo").contains("foo"));
        assert!(!SkipNames::from("foo").contains("bar"));

        let many = SkipNames::from(vec!["a".to_string(), "b".to_string()]);
        assert!(many.contains("b"));
        assert!(!many.contains("c"));
    }

    #[test]
    fn test_skip_names_deserializes_string_or_list() {
        let one: StaticPropFilter =
            serde_json::from_str(r#"{ "skipPropsWithName": "children" }"#).unwrap();
        let many: StaticPropFilter =
            serde_json::from_str(r#"{ "skipPropsWithName": ["a", "b"], "skipPropsWithoutDoc": true }"#)
                .unwrap();

        assert_eq!(one.skip_props_with_name, Some(SkipNames::One("children".into())));
        assert!(!one.skip_props_without_doc);
        assert_eq!(
            many.skip_props_with_name,
            Some(SkipNames::Many(vec!["a".into(), "b".into()]))
        );
        assert!(many.skip_props_without_doc);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "prop-etch.toml",
            r#"
shouldExtractLiteralValuesFromEnum = true

[propFilter]
skipPropsWithName = ["children", "className"]
skipPropsWithoutDoc = true
"#,
        );

        let options = ParserOptions::from_file(&path).unwrap();
        assert!(options.should_extract_literal_values_from_enum);
        assert_eq!(
            rule(&options),
            &StaticPropFilter::default()
                .skip_names(vec!["children".to_string(), "className".to_string()])
                .skip_undocumented()
        );
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "prop-etch.json",
            r#"{ "propFilter": { "skipPropsWithName": "foo" } }"#,
        );

        let options = ParserOptions::from_file(&path).unwrap();
        assert!(!options.should_extract_literal_values_from_enum);
        assert_eq!(rule(&options), &StaticPropFilter::default().skip_names("foo"));
    }

    #[test]
    fn test_invalid_options_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.json", r#"{ "propFilter": 42 }"#);

        let err = ParserOptions::from_file(&path).unwrap_err();
        assert!(matches!(err, DocError::Config { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_options_file_is_config_error() {
        let err = ParserOptions::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, DocError::Config { .. }));
    }

    #[test]
    fn test_predicate_debug() {
        let options = ParserOptions::new().with_predicate(|_, _| true);
        assert_eq!(
            format!("{:?}", options.prop_filter.unwrap()),
            "ByPredicate(<fn>)"
        );
    }
}
