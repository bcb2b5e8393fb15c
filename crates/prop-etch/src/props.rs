//! Component prop collection
//!
//! Given the symbol of a component contract, enumerate its props and
//! describe each one. Filtering happens afterwards, in the assembler, so
//! the map returned here may still hold props that are later dropped.

use crate::checker::TypeChecker;
use crate::comment::extract_comment;
use crate::prop_type::{extract_type, TypeDescriptor};
use crate::tags::TagMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Documented default of a prop, taken from its `@default` tag
///
/// This reflects documentation only, never an analysed runtime default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValue {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
}

/// One documented prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropItem {
    /// Prop name
    pub name: String,
    /// Negation of the optional flag on the declaration
    pub required: bool,
    /// Resolved type
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Documentation text
    pub description: String,
    /// Value of the `@default` tag
    pub default_value: DefaultValue,
    /// All JSDoc tags
    pub tags: TagMap,
}

/// Props keyed by name, in discovery order
pub type PropMap = IndexMap<String, PropItem>;

/// Collect the props of a component contract
pub fn collect_props<C: TypeChecker>(
    checker: &C,
    contract: &C::Symbol,
    extract_literal_values_from_enum: bool,
) -> PropMap {
    let declared = checker.declared_type_of_symbol(contract);
    let mut candidates = checker.properties_of_type(&declared);

    if candidates.is_empty() {
        let members = checker
            .union_members(&declared)
            .or_else(|| checker.intersection_members(&declared));
        if let Some(members) = members {
            candidates = members
                .iter()
                .flat_map(|member| checker.properties_of_type(member))
                .collect();
        }
    }

    let mut props = PropMap::new();
    for candidate in candidates {
        if !checker.symbol_flags(&candidate).property {
            continue;
        }
        if let Some(prop) = describe_prop(checker, &candidate, extract_literal_values_from_enum) {
            props.insert(prop.name.clone(), prop);
        }
    }
    props
}

/// Build the descriptor of one prop symbol
fn describe_prop<C: TypeChecker>(
    checker: &C,
    prop: &C::Symbol,
    extract_literal_values_from_enum: bool,
) -> Option<PropItem> {
    let name = checker.symbol_name(prop);
    let Some(declaration) = checker
        .value_declaration(prop)
        .or_else(|| checker.declarations(prop).into_iter().next())
    else {
        tracing::debug!(prop = %name, "prop has no declaration, skipping");
        return None;
    };

    let ty = checker.type_of_symbol_at_location(prop, &declaration);
    let flags = checker.symbol_flags(prop);
    let comment = extract_comment(checker, prop);
    let default_value = DefaultValue {
        value: comment.tags.get("default").map(|tag| tag.first().to_string()),
    };

    Some(PropItem {
        name,
        required: !flags.optional,
        ty: extract_type(checker, &ty, extract_literal_values_from_enum),
        description: comment.description,
        default_value,
        tags: comment.tags,
    })
}
