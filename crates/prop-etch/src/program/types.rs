//! Syntax-level TypeScript types
//!
//! [`TsType`] mirrors what was written in the source, not a checked type.
//! Printing follows the checker's canonical single-line form so the strings
//! match what TypeScript tooling shows for the same declaration.

use super::model::Member;
use super::model::MemberKind;
use std::fmt;
use std::sync::Arc;

/// Keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Object,
    Intrinsic,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Never => "never",
            Keyword::Void => "void",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::BigInt => "bigint",
            Keyword::Symbol => "symbol",
            Keyword::Object => "object",
            Keyword::Intrinsic => "intrinsic",
        }
    }
}

/// Literal types
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    String(String),
    Number(f64),
    /// Digits without the `n` suffix
    BigInt(String),
    Boolean(bool),
    Template(Vec<TemplatePart>),
}

/// Part of a template literal type
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Type(TsType),
}

/// Type operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    KeyOf,
    Unique,
    Readonly,
}

impl TypeOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeOperator::KeyOf => "keyof",
            TypeOperator::Unique => "unique",
            TypeOperator::Readonly => "readonly",
        }
    }
}

/// `+`, `-` or bare modifier of a mapped type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedModifier {
    Present,
    Plus,
    Minus,
}

impl MappedModifier {
    fn prefix(&self) -> &'static str {
        match self {
            MappedModifier::Present => "",
            MappedModifier::Plus => "+",
            MappedModifier::Minus => "-",
        }
    }
}

/// Type parameter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TsType>,
    pub default: Option<TsType>,
}

/// Parameter of a function type
#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub name: String,
    pub optional: bool,
    pub rest: bool,
    pub ty: Option<TsType>,
}

/// Function or constructor type
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<FnParam>,
    pub return_type: TsType,
    pub is_constructor: bool,
}

/// Mapped type `{ [K in C as N]: T }`
#[derive(Debug, Clone, PartialEq)]
pub struct MappedType {
    pub readonly: Option<MappedModifier>,
    pub type_param: String,
    pub constraint: Option<TsType>,
    pub name_type: Option<TsType>,
    pub optional: Option<MappedModifier>,
    pub ty: Option<TsType>,
}

/// Element of a tuple type
#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub label: Option<String>,
    pub ty: TsType,
}

/// A type as written in the source
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    Keyword(Keyword),
    Literal(LiteralType),
    /// Named reference, resolved lazily against the declaring file
    Reference { name: String, type_args: Vec<TsType> },
    Array(Box<TsType>),
    Tuple(Vec<TupleElement>),
    /// Optional tuple element `T?`
    Optional(Box<TsType>),
    /// Rest tuple element `...T`
    Rest(Box<TsType>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    Function(Box<FunctionType>),
    TypeLiteral(Vec<Arc<Member>>),
    Operator {
        operator: TypeOperator,
        ty: Box<TsType>,
    },
    IndexedAccess {
        object: Box<TsType>,
        index: Box<TsType>,
    },
    Conditional {
        check: Box<TsType>,
        extends: Box<TsType>,
        true_type: Box<TsType>,
        false_type: Box<TsType>,
    },
    Mapped(Box<MappedType>),
    Infer(String),
    Query(String),
    Import {
        argument: String,
        qualifier: Option<String>,
        type_args: Vec<TsType>,
    },
    Predicate {
        asserts: bool,
        param: String,
        ty: Option<Box<TsType>>,
    },
    This,
}

impl TsType {
    pub fn any() -> Self {
        TsType::Keyword(Keyword::Any)
    }

    pub fn undefined() -> Self {
        TsType::Keyword(Keyword::Undefined)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TsType::Reference {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        TsType::Literal(LiteralType::String(value.into()))
    }

    /// Whether this is `null` or `undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(
            self,
            TsType::Keyword(Keyword::Null) | TsType::Keyword(Keyword::Undefined)
        )
    }

    /// Binding strength when printed; higher binds tighter
    fn precedence(&self) -> u8 {
        match self {
            TsType::Function(_) | TsType::Conditional { .. } => 0,
            TsType::Union(types) if types.len() > 1 => 1,
            TsType::Intersection(types) if types.len() > 1 => 2,
            TsType::Operator { .. } | TsType::Infer(_) | TsType::Predicate { .. } => 3,
            TsType::Array(_)
            | TsType::IndexedAccess { .. }
            | TsType::Optional(_)
            | TsType::Rest(_) => 4,
            _ => 5,
        }
    }
}

/// Print `ty`, parenthesised when it binds looser than `min`
struct Operand<'a>(&'a TsType, u8);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.precedence() < self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_type_args(f: &mut fmt::Formatter<'_>, args: &[TsType]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    write_joined(f, args, ", ")?;
    f.write_str(">")
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralType::String(s) => write!(f, "\"{}\"", escape_string(s)),
            LiteralType::Number(n) => write!(f, "{}", n),
            LiteralType::BigInt(digits) => write!(f, "{}n", digits),
            LiteralType::Boolean(b) => write!(f, "{}", b),
            LiteralType::Template(parts) => {
                f.write_str("`")?;
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => f.write_str(text)?,
                        TemplatePart::Type(ty) => write!(f, "${{{}}}", ty)?,
                    }
                }
                f.write_str("`")
            }
        }
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " extends {}", constraint)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl fmt::Display for FnParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rest {
            f.write_str("...")?;
        }
        f.write_str(&self.name)?;
        if self.optional {
            f.write_str("?")?;
        }
        match &self.ty {
            Some(ty) => write!(f, ": {}", ty),
            None if self.rest => f.write_str(": any[]"),
            None => f.write_str(": any"),
        }
    }
}

impl FunctionType {
    fn write_signature(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.type_params.is_empty() {
            f.write_str("<")?;
            write_joined(f, &self.type_params, ", ")?;
            f.write_str(">")?;
        }
        f.write_str("(")?;
        write_joined(f, &self.params, ", ")?;
        f.write_str(")")
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional = if self.optional { "?" } else { "" };
        match (&self.kind, &self.ty) {
            (MemberKind::Method, Some(TsType::Function(func))) => {
                write!(f, "{}{}", self.name, optional)?;
                func.write_signature(f)?;
                write!(f, ": {};", func.return_type)
            }
            (MemberKind::Getter, ty) => {
                write!(f, "get {}(): {};", self.name, ty.clone().unwrap_or_else(TsType::any))
            }
            (MemberKind::Setter, ty) => write!(
                f,
                "set {}(value: {});",
                self.name,
                ty.clone().unwrap_or_else(TsType::any)
            ),
            (_, ty) => {
                if self.readonly {
                    f.write_str("readonly ")?;
                }
                write!(
                    f,
                    "{}{}: {};",
                    self.name,
                    optional,
                    ty.clone().unwrap_or_else(TsType::any)
                )
            }
        }
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsType::Keyword(keyword) => f.write_str(keyword.as_str()),
            TsType::Literal(literal) => write!(f, "{}", literal),
            TsType::Reference { name, type_args } => {
                f.write_str(name)?;
                write_type_args(f, type_args)
            }
            TsType::Array(element) => write!(f, "{}[]", Operand(&**element, 4)),
            TsType::Tuple(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match (&element.label, &element.ty) {
                        (Some(label), TsType::Optional(inner)) => {
                            write!(f, "{}?: {}", label, inner)?
                        }
                        (Some(label), TsType::Rest(inner)) => write!(f, "...{}: {}", label, inner)?,
                        (Some(label), ty) => write!(f, "{}: {}", label, ty)?,
                        (None, ty) => write!(f, "{}", ty)?,
                    }
                }
                f.write_str("]")
            }
            TsType::Optional(inner) => write!(f, "{}?", Operand(&**inner, 4)),
            TsType::Rest(inner) => write!(f, "...{}", Operand(&**inner, 4)),
            TsType::Union(types) => write_joined(f, types.iter().map(|t| Operand(t, 1)), " | "),
            TsType::Intersection(types) => {
                write_joined(f, types.iter().map(|t| Operand(t, 2)), " & ")
            }
            TsType::Function(func) => {
                if func.is_constructor {
                    f.write_str("new ")?;
                }
                func.write_signature(f)?;
                write!(f, " => {}", func.return_type)
            }
            TsType::TypeLiteral(members) => {
                if members.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for member in members {
                    write!(f, "{} ", member)?;
                }
                f.write_str("}")
            }
            TsType::Operator { operator, ty } => {
                write!(f, "{} {}", operator.keyword(), Operand(&**ty, 3))
            }
            TsType::IndexedAccess { object, index } => {
                write!(f, "{}[{}]", Operand(&**object, 4), index)
            }
            TsType::Conditional {
                check,
                extends,
                true_type,
                false_type,
            } => write!(
                f,
                "{} extends {} ? {} : {}",
                Operand(&**check, 1),
                Operand(&**extends, 1),
                true_type,
                false_type
            ),
            TsType::Mapped(mapped) => {
                f.write_str("{ ")?;
                if let Some(readonly) = mapped.readonly {
                    write!(f, "{}readonly ", readonly.prefix())?;
                }
                write!(f, "[{} in ", mapped.type_param)?;
                match &mapped.constraint {
                    Some(constraint) => write!(f, "{}", constraint)?,
                    None => f.write_str("any")?,
                }
                if let Some(name_type) = &mapped.name_type {
                    write!(f, " as {}", name_type)?;
                }
                f.write_str("]")?;
                if let Some(optional) = mapped.optional {
                    write!(f, "{}?", optional.prefix())?;
                }
                match &mapped.ty {
                    Some(ty) => write!(f, ": {}; }}", ty),
                    None => f.write_str(": any; }"),
                }
            }
            TsType::Infer(name) => write!(f, "infer {}", name),
            TsType::Query(name) => write!(f, "typeof {}", name),
            TsType::Import {
                argument,
                qualifier,
                type_args,
            } => {
                write!(f, "import(\"{}\")", argument)?;
                if let Some(qualifier) = qualifier {
                    write!(f, ".{}", qualifier)?;
                }
                write_type_args(f, type_args)
            }
            TsType::Predicate { asserts, param, ty } => {
                if *asserts {
                    f.write_str("asserts ")?;
                }
                f.write_str(param)?;
                match ty {
                    Some(ty) => write!(f, " is {}", ty),
                    None => Ok(()),
                }
            }
            TsType::This => f.write_str("this"),
        }
    }
}
