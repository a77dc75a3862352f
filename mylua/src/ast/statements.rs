//! Statement nodes.

use crate::ast::{BlockId, ExpId, NodeId};
use crate::parser::tokens::token::Token;
use crate::source::Location;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Clone, Debug, PartialEq)]
pub enum Stat {
    Break(BreakStat),
    Label(LabelStat),
    Goto(GotoStat),
    Do(DoStat),
    While(WhileStat),
    Repeat(RepeatStat),
    If(IfStat),
    ForNum(ForNumStat),
    ForIn(ForInStat),
    Assign(AssignStat),
    LocalVarDecl(LocalVarDeclStat),
    LocalFuncDef(LocalFuncDefStat),
    FuncCall(FuncCallStat),
    Return(ReturnStat),
}

// The generated methods stay private; `Stat` exposes plain wrappers instead.
#[enum_dispatch(Stat)]
trait StatKind {
    fn location_(&self) -> Location;
    fn children_(&self) -> Vec<NodeId>;
}

impl Stat {
    pub fn location(&self) -> Location {
        self.location_()
    }

    /// Blocks and expressions directly owned by the statement, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        self.children_()
    }
}

fn exp_nodes(exps: &[ExpId]) -> impl Iterator<Item = NodeId> + '_ {
    exps.iter().map(|&exp| NodeId::Exp(exp))
}

macro_rules! impl_leaf_stat_kind {
    ($type_name:ty) => {
        impl StatKind for $type_name {
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
pub struct BreakStat {
    pub location: Location,
}
impl_leaf_stat_kind!(BreakStat);

/// `::name::`
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStat {
    pub name: Token,

    pub location: Location,
}
impl_leaf_stat_kind!(LabelStat);

#[derive(Clone, Debug, PartialEq)]
pub struct GotoStat {
    pub name: Token,

    pub location: Location,
}
impl_leaf_stat_kind!(GotoStat);

#[derive(Clone, Debug, PartialEq)]
pub struct DoStat {
    pub block: BlockId,

    pub location: Location,
}

impl StatKind for DoStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.block.into()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStat {
    pub condition: ExpId,
    pub block: BlockId,

    pub location: Location,
}

impl StatKind for WhileStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.condition.into(), self.block.into()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RepeatStat {
    pub block: BlockId,
    pub condition: ExpId,

    pub location: Location,
}

impl StatKind for RepeatStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.block.into(), self.condition.into()]
    }
}

/// One `if`/`elseif` arm.
#[derive(Clone, Debug, PartialEq)]
pub struct IfClause {
    pub condition: ExpId,
    pub block: BlockId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStat {
    /// The `if` arm followed by all `elseif` arms.
    pub clauses: Vec<IfClause>,
    pub else_block: Option<BlockId>,

    pub location: Location,
}

impl StatKind for IfStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        for clause in &self.clauses {
            children.push(clause.condition.into());
            children.push(clause.block.into());
        }
        children.extend(self.else_block.map(NodeId::Block));
        children
    }
}

/// `for name = start, limit [, step] do block end`
#[derive(Clone, Debug, PartialEq)]
pub struct ForNumStat {
    pub variable: Token,
    pub start: ExpId,
    pub limit: ExpId,
    pub step: Option<ExpId>,
    pub block: BlockId,

    pub location: Location,
}

impl StatKind for ForNumStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        let mut children = vec![self.start.into(), self.limit.into()];
        children.extend(self.step.map(NodeId::Exp));
        children.push(self.block.into());
        children
    }
}

/// `for namelist in explist do block end`
#[derive(Clone, Debug, PartialEq)]
pub struct ForInStat {
    pub names: Vec<Token>,
    pub exps: Vec<ExpId>,
    pub block: BlockId,

    pub location: Location,
}

impl StatKind for ForInStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        exp_nodes(&self.exps)
            .chain(std::iter::once(self.block.into()))
            .collect()
    }
}

/// `varlist = explist`. Function declarations (`function a.b:c() end`) are lowered into this
/// form as well.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignStat {
    pub targets: Vec<ExpId>,
    pub values: Vec<ExpId>,

    pub location: Location,
}

impl StatKind for AssignStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        exp_nodes(&self.targets).chain(exp_nodes(&self.values)).collect()
    }
}

/// `local name [attrib] {, name [attrib]} [= explist]`
///
/// The `<const>`/`<close>` attribute of each name is stored on its token.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalVarDeclStat {
    pub names: Vec<Token>,
    pub values: Vec<ExpId>,

    pub location: Location,
}

impl StatKind for LocalVarDeclStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        exp_nodes(&self.values).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocalFuncDefStat {
    pub name: Token,
    pub function: ExpId,

    pub location: Location,
}

impl StatKind for LocalFuncDefStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.function.into()]
    }
}

/// A function call evaluated for its side effects.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncCallStat {
    pub call: ExpId,

    pub location: Location,
}

impl StatKind for FuncCallStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        vec![self.call.into()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStat {
    pub values: Vec<ExpId>,

    pub location: Location,
}

impl StatKind for ReturnStat {
    fn location_(&self) -> Location {
        self.location
    }

    fn children_(&self) -> Vec<NodeId> {
        exp_nodes(&self.values).collect()
    }
}
