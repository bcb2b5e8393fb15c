//! Prop filtering
//!
//! A [`PropFilter`] is built once from [`ParserOptions`] and asked about
//! every prop of every component. It never mutates what it inspects.

use crate::options::{ParserOptions, PropFilterConfig, PropPredicate, StaticPropFilter};
use crate::props::PropItem;
use serde::{Deserialize, Serialize};

/// Identity of the component that owns the prop being filtered
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Resolved filter for one extraction run
#[derive(Clone, Default)]
pub enum PropFilter {
    /// Keep every prop
    #[default]
    KeepAll,
    Predicate(PropPredicate),
    Rule(StaticPropFilter),
}

impl PropFilter {
    /// Resolve the configured filter form
    pub fn new(options: &ParserOptions) -> Self {
        match &options.prop_filter {
            None => PropFilter::KeepAll,
            Some(PropFilterConfig::ByPredicate(predicate)) => {
                PropFilter::Predicate(predicate.clone())
            }
            Some(PropFilterConfig::ByRule(rule)) => PropFilter::Rule(rule.clone()),
        }
    }

    /// Whether `prop` of `component` survives
    pub fn keep(&self, prop: &PropItem, component: &Component) -> bool {
        match self {
            PropFilter::KeepAll => true,
            PropFilter::Predicate(predicate) => predicate(prop, component),
            PropFilter::Rule(rule) => keep_by_rule(rule, prop),
        }
    }
}

impl std::fmt::Debug for PropFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropFilter::KeepAll => f.write_str("KeepAll"),
            PropFilter::Predicate(_) => f.write_str("Predicate(<fn>)"),
            PropFilter::Rule(rule) => f.debug_tuple("Rule").field(rule).finish(),
        }
    }
}

fn keep_by_rule(rule: &StaticPropFilter, prop: &PropItem) -> bool {
    if let Some(names) = &rule.skip_props_with_name {
        if names.contains(&prop.name) {
            return false;
        }
    }
    if rule.skip_props_without_doc && prop.description.is_empty() {
        return false;
    }
    true
}
