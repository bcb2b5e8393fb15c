//! Prop type descriptors
//!
//! A prop's resolved type becomes a [`TypeDescriptor`]. Unions made only of
//! string literals can optionally be rendered as an `enum` with an explicit
//! list of values, which is what playground tooling needs to offer a select
//! box instead of a text field.

use crate::checker::TypeChecker;
use serde::{Deserialize, Serialize};

/// Name used for string-literal unions when enum extraction applies
pub const ENUM_TYPE_NAME: &str = "enum";

/// One literal of an extracted enum, quoted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: String,
}

impl EnumValue {
    /// Wrap a literal in double quotes
    pub fn quoted(literal: &str) -> Self {
        Self {
            value: format!("\"{}\"", literal),
        }
    }
}

/// Structured type of a prop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Canonical type string, or `"enum"`
    pub name: String,
    /// Original type string when `name` is `"enum"`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw: Option<String>,
    /// Literal values in union order when `name` is `"enum"`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<Vec<EnumValue>>,
}

impl TypeDescriptor {
    /// Descriptor holding only a type string
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: None,
            value: None,
        }
    }

    /// Enum descriptor
    pub fn enumeration(raw: impl Into<String>, values: Vec<EnumValue>) -> Self {
        Self {
            name: ENUM_TYPE_NAME.to_string(),
            raw: Some(raw.into()),
            value: Some(values),
        }
    }

    /// Whether this descriptor is an extracted enum
    pub fn is_enum(&self) -> bool {
        self.value.is_some()
    }
}

/// Build the descriptor for one prop type
///
/// Never fails: types the engine cannot resolve pass through as whatever
/// fallback string the engine prints for them.
pub fn extract_type<C: TypeChecker>(
    checker: &C,
    ty: &C::Type,
    extract_literal_values_from_enum: bool,
) -> TypeDescriptor {
    let type_string = checker.type_to_string(ty);

    if extract_literal_values_from_enum {
        if let Some(values) = string_literal_union(checker, ty) {
            return TypeDescriptor::enumeration(type_string, values);
        }
    }

    TypeDescriptor::named(type_string)
}

/// Literal values of a union whose members are all string literals
fn string_literal_union<C: TypeChecker>(checker: &C, ty: &C::Type) -> Option<Vec<EnumValue>> {
    let members = checker.union_members(ty)?;
    let literals: Vec<String> = members
        .iter()
        .map(|member| checker.string_literal_value(member))
        .collect::<Option<_>>()?;

    if literals.is_empty() {
        return None;
    }

    Some(literals.iter().map(|literal| EnumValue::quoted(literal)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{MockChecker, MockType};
    use pretty_assertions::assert_eq;

    fn color_union() -> MockType {
        MockType::Union(vec![
            MockType::StringLiteral("a".into()),
            MockType::StringLiteral("b".into()),
        ])
    }

    #[test]
    fn test_literal_union_becomes_enum() {
        let checker = MockChecker::new();
        let descriptor = extract_type(&checker, &color_union(), true);

        assert_eq!(
            descriptor,
            TypeDescriptor {
                name: "enum".into(),
                raw: Some(r#""a" | "b""#.into()),
                value: Some(vec![EnumValue::quoted("a"), EnumValue::quoted("b")]),
            }
        );
        assert_eq!(descriptor.value.unwrap()[0].value, r#""a""#);
    }

    #[test]
    fn test_literal_union_without_flag() {
        let checker = MockChecker::new();
        let descriptor = extract_type(&checker, &color_union(), false);
        assert_eq!(descriptor, TypeDescriptor::named(r#""a" | "b""#));
    }

    #[test]
    fn test_mixed_union_is_not_enum() {
        let checker = MockChecker::new();
        let ty = MockType::Union(vec![
            MockType::StringLiteral("a".into()),
            MockType::Named("undefined".into()),
        ]);
        assert_eq!(
            extract_type(&checker, &ty, true),
            TypeDescriptor::named(r#""a" | undefined"#)
        );
    }

    #[test]
    fn test_plain_type_passes_through() {
        let checker = MockChecker::new();
        let ty = MockType::Named("string".into());
        assert_eq!(extract_type(&checker, &ty, true), TypeDescriptor::named("string"));
    }

    #[test]
    fn test_unresolved_type_keeps_engine_fallback() {
        let checker = MockChecker::new();
        let ty = MockType::Named("any".into());
        assert_eq!(extract_type(&checker, &ty, true).name, "any");
    }

    #[test]
    fn test_serialized_shape() {
        let checker = MockChecker::new();
        insta::assert_json_snapshot!(extract_type(&checker, &color_union(), true), @r#"
        {
          "name": "enum",
          "raw": "\"a\" | \"b\"",
          "value": [
            {
              "value": "\"a\""
            },
            {
              "value": "\"b\""
            }
          ]
        }
        "#);
    }
}
