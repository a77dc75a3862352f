//! Tokens of the `---@` annotation mini-language.
//!
//! Annotations have their own keyword set, distinct from Lua keywords: `local` is a plain name
//! here, while `fun` or `class` are reserved.

use crate::source::Location;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationTokenKind {
    Comma,
    Colon,
    Vararg,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Pipe,
    Less,
    Greater,
    At,
    Question,
    Name,
    Number,
    String,
    KwFun,
    KwTable,
    KwType,
    KwParam,
    KwField,
    KwClass,
    KwReturn,
    KwOverload,
    KwAlias,
    KwGeneric,
    KwPublic,
    KwProtected,
    KwPrivate,
    KwVararg,
    KwConst,
    KwEnum,

    /// Anything the annotation grammar has no use for.
    Other,
}

impl AnnotationTokenKind {
    pub fn keyword(text: &str) -> Option<AnnotationTokenKind> {
        use AnnotationTokenKind::*;
        let kind = match text {
            "fun" => KwFun,
            "table" => KwTable,
            "type" => KwType,
            "param" => KwParam,
            "field" => KwField,
            "class" => KwClass,
            "return" => KwReturn,
            "overload" => KwOverload,
            "alias" => KwAlias,
            "generic" => KwGeneric,
            "public" => KwPublic,
            "protected" => KwProtected,
            "private" => KwPrivate,
            "vararg" => KwVararg,
            "const" => KwConst,
            "enum" => KwEnum,
            _ => return None,
        };
        Some(kind)
    }

    /// Checks whether the token starts a tag when it directly follows `---@`.
    pub fn is_tag(self) -> bool {
        use AnnotationTokenKind::*;
        matches!(
            self,
            KwType
                | KwParam
                | KwField
                | KwClass
                | KwReturn
                | KwOverload
                | KwAlias
                | KwGeneric
                | KwVararg
                | KwEnum
        )
    }
}

impl Display for AnnotationTokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use AnnotationTokenKind::*;
        let text = match self {
            Comma => "`,`",
            Colon => "`:`",
            Vararg => "`...`",
            LeftParen => "`(`",
            RightParen => "`)`",
            LeftBracket => "`[`",
            RightBracket => "`]`",
            LeftBrace => "`{`",
            RightBrace => "`}`",
            Pipe => "`|`",
            Less => "`<`",
            Greater => "`>`",
            At => "`@`",
            Question => "`?`",
            Name => "name",
            Number => "number",
            String => "string",
            KwFun => "`fun`",
            KwTable => "`table`",
            KwType => "`type`",
            KwParam => "`param`",
            KwField => "`field`",
            KwClass => "`class`",
            KwReturn => "`return`",
            KwOverload => "`overload`",
            KwAlias => "`alias`",
            KwGeneric => "`generic`",
            KwPublic => "`public`",
            KwProtected => "`protected`",
            KwPrivate => "`private`",
            KwVararg => "`vararg`",
            KwConst => "`const`",
            KwEnum => "`enum`",
            Other => "unknown token",
        };
        write!(f, "{}", text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationToken {
    pub kind: AnnotationTokenKind,
    pub text: String,
    pub location: Location,
}
