//! Static types described by `---@` annotations.
//!
//! These are plain data: names are kept as written and resolved elsewhere.

use crate::source::Location;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, PartialEq)]
pub struct NameAndLocation {
    pub name: String,
    pub location: Location,
}

impl NameAndLocation {
    pub fn new(name: impl Into<String>, location: Location) -> NameAndLocation {
        NameAndLocation {
            name: name.into(),
            location,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Nil,
    True,
    False,
    Number(f64),
    String(String),
}

/// A named slot with a type: map fields and generic parameters.
///
/// Generic parameters without a constraint have no type.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub name: NameAndLocation,
    pub type_: Option<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapType {
    pub fields: Vec<KeyValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayType {
    pub element: Box<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionType {
    pub alternatives: Vec<Type>,
}

/// A type referred to by name: `number`, `Person`, or a generic parameter such as `T`.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentifierType {
    pub name: NameAndLocation,
    pub is_generic_param: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionParam {
    /// `...` for a variadic parameter.
    pub name: NameAndLocation,
    pub type_: Type,
    pub is_optional: bool,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionReturn {
    pub type_: Type,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    pub params: Vec<FunctionParam>,
    pub returns: Vec<FunctionReturn>,
    pub comment: String,
}

/// `Name<T1, T2>`
#[derive(Clone, Debug, PartialEq)]
pub struct GenericInstanceType {
    pub name: NameAndLocation,
    pub type_args: Vec<Type>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassField {
    pub name: NameAndLocation,
    pub type_: Type,
    pub comment: String,
    pub is_optional: bool,
    pub visibility: Visibility,
}

/// A type introduced by `@class`, with the fields collected from the `@field` lines after it.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassType {
    pub name: NameAndLocation,
    pub parents: Vec<Type>,
    pub generic_params: Vec<KeyValue>,
    pub fields: Vec<ClassField>,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AliasType {
    pub name: NameAndLocation,
    pub target: Box<Type>,
    pub comment: String,
}

/// Enum members live in the table literal that follows the annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    pub name: NameAndLocation,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Literal(LiteralValue),
    Map(MapType),
    Array(ArrayType),
    Union(UnionType),
    Identifier(IdentifierType),
    Function(FunctionType),
    GenericInstance(GenericInstanceType),
    Class(ClassType),
    Alias(AliasType),
    Enum(EnumType),
}

impl Type {
    pub fn identifier(name: impl Into<String>, location: Location) -> Type {
        Type::Identifier(IdentifierType {
            name: NameAndLocation::new(name, location),
            is_generic_param: false,
        })
    }

    pub fn array(element: Type) -> Type {
        Type::Array(ArrayType {
            element: Box::new(element),
        })
    }

    /// Joins two types with `|`. Nested unions are flattened, so `a|b|c` is a single union of
    /// three alternatives in source order.
    pub fn union(lhs: Type, rhs: Type) -> Type {
        let mut alternatives = Vec::new();
        for type_ in vec![lhs, rhs] {
            match type_ {
                Type::Union(union) => alternatives.extend(union.alternatives),
                other => alternatives.push(other),
            }
        }
        Type::Union(UnionType { alternatives })
    }

    /// Checks whether `nil` is one of the values of this type.
    pub fn is_nilable(&self) -> bool {
        match self {
            Type::Literal(LiteralValue::Nil) => true,
            Type::Identifier(identifier) => identifier.name.name == "nil",
            Type::Union(union) => union.alternatives.iter().any(Type::is_nilable),
            _ => false,
        }
    }

    /// The declared name for named types, `None` for structural ones.
    pub fn name(&self) -> Option<&NameAndLocation> {
        match self {
            Type::Identifier(IdentifierType { name, .. })
            | Type::GenericInstance(GenericInstanceType { name, .. })
            | Type::Class(ClassType { name, .. })
            | Type::Alias(AliasType { name, .. })
            | Type::Enum(EnumType { name, .. }) => Some(name),
            _ => None,
        }
    }
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Nil => write!(f, "nil"),
            LiteralValue::True => write!(f, "true"),
            LiteralValue::False => write!(f, "false"),
            LiteralValue::Number(value) => write!(f, "{}", value),
            LiteralValue::String(value) => write!(f, "{:?}", value),
        }
    }
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.type_ {
            Some(type_) => write!(f, "{}: {}", self.name.name, type_),
            None => write!(f, "{}", self.name.name),
        }
    }
}

impl Display for FunctionParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let optional = if self.is_optional { "?" } else { "" };
        write!(f, "{}{}: {}", self.name.name, optional, self.type_)
    }
}

impl Display for FunctionReturn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_)
    }
}

/// Renders types back in annotation syntax.
impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Literal(value) => write!(f, "{}", value),
            Type::Map(map) => {
                write!(f, "{{")?;
                write_separated(f, &map.fields)?;
                write!(f, "}}")
            }
            Type::Array(array) => match *array.element {
                Type::Union(_) | Type::Function(_) => write!(f, "({})[]", array.element),
                ref element => write!(f, "{}[]", element),
            },
            Type::Union(union) => {
                for (index, alternative) in union.alternatives.iter().enumerate() {
                    if index > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", alternative)?;
                }
                Ok(())
            }
            Type::Identifier(identifier) => write!(f, "{}", identifier.name.name),
            Type::Function(function) => {
                write!(f, "fun(")?;
                write_separated(f, &function.params)?;
                write!(f, ")")?;
                if !function.returns.is_empty() {
                    write!(f, ": ")?;
                    write_separated(f, &function.returns)?;
                }
                Ok(())
            }
            Type::GenericInstance(instance) => {
                write!(f, "{}<", instance.name.name)?;
                write_separated(f, &instance.type_args)?;
                write!(f, ">")
            }
            Type::Class(class) => write!(f, "{}", class.name.name),
            Type::Alias(alias) => write!(f, "{}", alias.name.name),
            Type::Enum(enum_) => write!(f, "{}", enum_.name.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Type {
        Type::identifier(name, Location::default())
    }

    #[test]
    fn unions_are_flattened() {
        let type_ = Type::union(Type::union(named("a"), named("b")), named("c"));
        match &type_ {
            Type::Union(union) => assert_eq!(union.alternatives.len(), 3),
            other => panic!("expected a union, got {:?}", other),
        }
        assert_eq!(type_.to_string(), "a|b|c");

        let right = Type::union(named("a"), Type::union(named("b"), named("c")));
        assert_eq!(right, type_);
    }

    #[test]
    fn nilable_types() {
        assert!(Type::union(named("string"), named("nil")).is_nilable());
        assert!(Type::Literal(LiteralValue::Nil).is_nilable());
        assert!(!named("string").is_nilable());
        assert!(!Type::array(named("nil")).is_nilable());
    }

    #[test]
    fn display_in_annotation_syntax() {
        let function = Type::Function(FunctionType {
            params: vec![
                FunctionParam {
                    name: NameAndLocation::new("a", Location::default()),
                    type_: named("number"),
                    is_optional: false,
                    comment: String::new(),
                },
                FunctionParam {
                    name: NameAndLocation::new("b", Location::default()),
                    type_: Type::union(named("string"), named("nil")),
                    is_optional: true,
                    comment: String::new(),
                },
            ],
            returns: vec![FunctionReturn {
                type_: Type::Literal(LiteralValue::String("ok".to_string())),
                comment: String::new(),
            }],
            comment: String::new(),
        });
        assert_eq!(
            function.to_string(),
            "fun(a: number, b?: string|nil): \"ok\""
        );

        let map = Type::Map(MapType {
            fields: vec![KeyValue {
                name: NameAndLocation::new("x", Location::default()),
                type_: Some(Type::array(named("integer"))),
            }],
        });
        assert_eq!(map.to_string(), "{x: integer[]}");

        let instance = Type::GenericInstance(GenericInstanceType {
            name: NameAndLocation::new("table", Location::default()),
            type_args: vec![named("string"), Type::array(function)],
        });
        assert_eq!(
            instance.to_string(),
            "table<string, (fun(a: number, b?: string|nil): \"ok\")[]>"
        );
    }

    #[test]
    fn named_types() {
        assert_eq!(named("Person").name().map(|name| name.name.as_str()), Some("Person"));
        assert_eq!(Type::array(named("Person")).name(), None);
    }
}
