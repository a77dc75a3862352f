//! One shape per `---@` tag line.
//!
//! Tags are recognized one line at a time. A function or class type is assembled from the
//! tags of a whole comment block, see `FunctionType::from_tags` and `ClassTag::into_class`.

use crate::annotation::types::{
    ClassField, ClassType, FunctionParam, FunctionReturn, FunctionType, KeyValue,
    NameAndLocation, Type, Visibility,
};
use crate::source::Location;

/// `---@generic T [: Type] {, U [: Type]}`
#[derive(Clone, Debug, PartialEq)]
pub struct GenericTag {
    pub params: Vec<GenericParam>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenericParam {
    pub name: NameAndLocation,
    pub constraint: Option<Type>,
}

/// `---@type Type {, Type}`
#[derive(Clone, Debug, PartialEq)]
pub struct TypeTag {
    pub types: Vec<Type>,
    pub comment: String,
}

/// `---@param name[?] Type`. The name is `...` for the variadic parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamTag {
    pub name: NameAndLocation,
    pub type_: Type,
    pub is_optional: bool,
    pub comment: String,
}

/// `---@return Type {, Type}`
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnTag {
    pub types: Vec<Type>,
    pub comment: String,
}

/// `---@class Name [: Parent {, Parent}]`
#[derive(Clone, Debug, PartialEq)]
pub struct ClassTag {
    pub name: NameAndLocation,
    pub parents: Vec<Type>,
    pub comment: String,
}

/// `---@field [public|protected|private] name[?] Type`
#[derive(Clone, Debug, PartialEq)]
pub struct FieldTag {
    pub visibility: Visibility,
    pub name: NameAndLocation,
    pub type_: Type,
    pub is_optional: bool,
    pub comment: String,
}

/// `---@alias Name Type`
#[derive(Clone, Debug, PartialEq)]
pub struct AliasTag {
    pub name: NameAndLocation,
    pub type_: Type,
    pub comment: String,
}

/// `---@enum Name`
#[derive(Clone, Debug, PartialEq)]
pub struct EnumTag {
    pub name: NameAndLocation,
    pub comment: String,
}

/// `---@overload fun(...)`
#[derive(Clone, Debug, PartialEq)]
pub struct OverloadTag {
    pub function: FunctionType,
}

/// `---@vararg Type`
#[derive(Clone, Debug, PartialEq)]
pub struct VarargTag {
    pub type_: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationTag {
    Generic(GenericTag),
    Type(TypeTag),
    Param(ParamTag),
    Return(ReturnTag),
    Class(ClassTag),
    Field(FieldTag),
    Alias(AliasTag),
    Enum(EnumTag),
    Overload(OverloadTag),
    Vararg(VarargTag),
}

impl From<FieldTag> for ClassField {
    fn from(tag: FieldTag) -> ClassField {
        ClassField {
            name: tag.name,
            type_: tag.type_,
            comment: tag.comment,
            is_optional: tag.is_optional,
            visibility: tag.visibility,
        }
    }
}

impl ClassTag {
    /// Builds the class type from its header tag plus the `@generic` and `@field` tags of the
    /// same comment block.
    pub fn into_class(self, generics: Vec<GenericTag>, fields: Vec<FieldTag>) -> ClassType {
        let generic_params = generics
            .into_iter()
            .flat_map(|tag| tag.params)
            .map(|param| KeyValue {
                name: param.name,
                type_: param.constraint,
            })
            .collect();

        ClassType {
            name: self.name,
            parents: self.parents,
            generic_params,
            fields: fields.into_iter().map(ClassField::from).collect(),
            comment: self.comment,
        }
    }
}

impl FunctionType {
    /// Builds a function signature from the `@param`, `@vararg` and `@return` tags that document
    /// a function definition.
    ///
    /// `@vararg` is the older spelling of `@param ... Type` and is appended as a `...` parameter
    /// unless one was already declared.
    pub fn from_tags(
        params: Vec<ParamTag>,
        vararg: Option<VarargTag>,
        returns: Vec<ReturnTag>,
    ) -> FunctionType {
        let mut params: Vec<FunctionParam> = params
            .into_iter()
            .map(|tag| FunctionParam {
                name: tag.name,
                type_: tag.type_,
                is_optional: tag.is_optional,
                comment: tag.comment,
            })
            .collect();

        if let Some(vararg) = vararg {
            if !params.iter().any(|param| param.name.name == "...") {
                let location = vararg.type_location();
                params.push(FunctionParam {
                    name: NameAndLocation::new("...", location),
                    type_: vararg.type_,
                    is_optional: true,
                    comment: String::new(),
                });
            }
        }

        let returns = returns
            .into_iter()
            .flat_map(|tag| {
                let comment = tag.comment;
                tag.types.into_iter().map(move |type_| FunctionReturn {
                    type_,
                    comment: comment.clone(),
                })
            })
            .collect();

        FunctionType {
            params,
            returns,
            comment: String::new(),
        }
    }
}

impl VarargTag {
    fn type_location(&self) -> Location {
        self.type_
            .name()
            .map(|name| name.location)
            .unwrap_or_default()
    }
}
