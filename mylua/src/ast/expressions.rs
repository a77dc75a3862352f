//! Expression nodes.

use crate::ast::{BlockId, ExpId, NodeId};
use crate::parser::tokens::token::{Token, TokenKind};
use crate::source::Location;
use enum_dispatch::enum_dispatch;
use std::fmt::{self, Display, Formatter};

#[enum_dispatch]
#[derive(Clone, Debug, PartialEq)]
pub enum Exp {
    Nil(NilExp),
    True(TrueExp),
    False(FalseExp),
    Vararg(VarargExp),
    Integer(IntegerExp),
    Float(FloatExp),
    String(StringExp),
    Unop(UnopExp),
    Binop(BinopExp),
    TableConstructor(TableConstructorExp),
    FuncDef(FuncDefExp),
    Name(NameExp),
    Parens(ParensExp),
    TableAccess(TableAccessExp),
    FuncCall(FuncCallExp),
    Bad(BadExp),
}

// We don't expose the generated methods of `Exp` to the outside, keeping usage of
// `enum_dispatch` as opaque as possible.
#[enum_dispatch(Exp)]
trait ExpKind {
    fn location_(&self) -> Location;
    fn children_(&self) -> Vec<NodeId>;
}

impl Exp {
    pub fn location(&self) -> Location {
        self.location_()
    }

    /// Blocks and expressions directly owned by the expression, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        self.children_()
    }

    /// Checks whether the expression can appear on the left side of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Exp::Name(_) | Exp::TableAccess(_))
    }
}

macro_rules! impl_leaf_exp_kind {
    ($type_name:ty) => {
        impl ExpKind for $type_name {
            fn location_(&self) -> Location {
                self.location
            }

            fn children_(&self) -> Vec<NodeId> {
                Vec::new()
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct NilExp {
    pub location: Location,
}
impl_leaf_exp_kind!(NilExp);

#[derive(Clone, Debug, PartialEq)]
pub struct TrueExp {
    pub location: Location,
}
impl_leaf_exp_kind!(TrueExp);

#[derive(Clone, Debug, PartialEq)]
pub struct FalseExp {
    pub location: Location,
}
impl_leaf_exp_kind!(FalseExp);

/// `...`
#[derive(Clone, Debug, PartialEq)]
pub struct VarargExp {
    pub location: Location,
}
impl_leaf_exp_kind!(VarargExp);

#[derive(Clone, Debug, PartialEq)]
pub struct IntegerExp {
    pub value: i64,

    pub location: Location,
}
impl_leaf_exp_kind!(IntegerExp);

#[derive(Clone, Debug, PartialEq)]
pub struct FloatExp {
    pub value: f64,

    pub location: Location,
}
impl_leaf_exp_kind!(FloatExp);

/// A string literal. Escape sequences other than line continuations and `\z` are kept as
/// written in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct StringExp {
    pub value: String,

    pub location: Location,
}
impl_leaf_exp_kind!(StringExp);

#[derive(Clone, Debug, PartialEq)]
pub struct UnopExp {
    pub operator: UnaryOperator,
    pub operand: ExpId,

    pub location: Location,
}

impl ExpKind for UnopExp {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.operand.into()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinopExp {
    pub operator: BinaryOperator,
    pub lhs: ExpId,
    pub rhs: ExpId,

    pub location: Location,
}

impl ExpKind for BinopExp {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.lhs.into(), self.rhs.into()]
    }
}

/// A field of a table constructor. `key` is `None` for positional fields; `name = value` is
/// stored with a string key.
#[derive(Clone, Debug, PartialEq)]
pub struct TableField {
    pub key: Option<ExpId>,
    pub value: ExpId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableConstructorExp {
    pub fields: Vec<TableField>,

    pub location: Location,
}

impl ExpKind for TableConstructorExp {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        for field in &self.fields {
            children.extend(field.key.map(NodeId::Exp));
            children.push(field.value.into());
        }
        children
    }
}

/// A function body: `function (params) block end`, also used for function declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDefExp {
    pub params: Vec<Token>,
    pub is_vararg: bool,

    /// Set for `function a:b() end`, where `self` is an implicit first parameter.
    pub is_method: bool,

    pub block: BlockId,

    pub location: Location,
}

impl ExpKind for FuncDefExp {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.block.into()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NameExp {
    pub name: String,

    pub location: Location,
}
impl_leaf_exp_kind!(NameExp);

/// A parenthesized expression. Only kept where parentheses change the meaning: around calls
/// and varargs (truncation to one value) and around names or indexing (not assignable).
#[derive(Clone, Debug, PartialEq)]
pub struct ParensExp {
    pub inner: ExpId,

    pub location: Location,
}

impl ExpKind for ParensExp {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.inner.into()]
    }
}

/// `prefix[key]`; `prefix.name` is stored with a string key.
#[derive(Clone, Debug, PartialEq)]
pub struct TableAccessExp {
    pub prefix: ExpId,
    pub key: ExpId,

    pub location: Location,
}

impl ExpKind for TableAccessExp {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.prefix.into(), self.key.into()]
    }
}

/// `prefix(args)` or, with `method` set to a string expression, `prefix:method(args)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncCallExp {
    pub prefix: ExpId,
    pub method: Option<ExpId>,
    pub args: Vec<ExpId>,

    pub location: Location,
}

impl ExpKind for FuncCallExp {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        let mut children = vec![self.prefix.into()];
        children.extend(self.method.map(NodeId::Exp));
        children.extend(self.args.iter().map(|&arg| NodeId::from(arg)));
        children
    }
}

/// Placeholder for an expression that could not be parsed. An error is always reported
/// alongside it.
#[derive(Clone, Debug, PartialEq)]
pub struct BadExp {
    pub location: Location,
}
impl_leaf_exp_kind!(BadExp);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Length,
    Negate,
    BitNot,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOperator> {
        match kind {
            TokenKind::KwNot => Some(UnaryOperator::Not),
            TokenKind::Hash => Some(UnaryOperator::Length),
            TokenKind::Minus => Some(UnaryOperator::Negate),
            TokenKind::Tilde => Some(UnaryOperator::BitNot),
            _ => None,
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            UnaryOperator::Not => "not",
            UnaryOperator::Length => "#",
            UnaryOperator::Negate => "-",
            UnaryOperator::BitNot => "~",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    NotEqual,
    Equal,
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOperator> {
        use BinaryOperator::*;
        let operator = match kind {
            TokenKind::KwOr => Or,
            TokenKind::KwAnd => And,
            TokenKind::Less => Less,
            TokenKind::Greater => Greater,
            TokenKind::LessEqual => LessEqual,
            TokenKind::GreaterEqual => GreaterEqual,
            TokenKind::NotEquals => NotEqual,
            TokenKind::DoubleEquals => Equal,
            TokenKind::Pipe => BitOr,
            TokenKind::Tilde => BitXor,
            TokenKind::Ampersand => BitAnd,
            TokenKind::ShiftLeft => ShiftLeft,
            TokenKind::ShiftRight => ShiftRight,
            TokenKind::DoubleDot => Concat,
            TokenKind::Plus => Add,
            TokenKind::Minus => Sub,
            TokenKind::Asterisk => Mul,
            TokenKind::Slash => Div,
            TokenKind::DoubleSlash => FloorDiv,
            TokenKind::Percent => Mod,
            TokenKind::Caret => Pow,
            _ => return None,
        };
        Some(operator)
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use BinaryOperator::*;
        let symbol = match self {
            Or => "or",
            And => "and",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            NotEqual => "~=",
            Equal => "==",
            BitOr => "|",
            BitXor => "~",
            BitAnd => "&",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Concat => "..",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            FloorDiv => "//",
            Mod => "%",
            Pow => "^",
        };
        write!(f, "{}", symbol)
    }
}
