//! Abstract syntax tree representation. This is the interface between the parser and tooling
//! built on top of it.
//!
//! Nodes live in a `Chunk` arena and refer to each other through typed ids. Every node records
//! its parent id, which gives cheap upward navigation without shared ownership.

use crate::source::Location;

mod display;
mod expressions;
mod statements;

pub use expressions::*;
pub use statements::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpId(usize);

/// Any node in a `Chunk`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
    Block(BlockId),
    Stat(StatId),
    Exp(ExpId),
}

impl From<BlockId> for NodeId {
    fn from(id: BlockId) -> NodeId {
        NodeId::Block(id)
    }
}

impl From<StatId> for NodeId {
    fn from(id: StatId) -> NodeId {
        NodeId::Stat(id)
    }
}

impl From<ExpId> for NodeId {
    fn from(id: ExpId) -> NodeId {
        NodeId::Exp(id)
    }
}

/// A sequence of statements: `{stat} [retstat]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stats: Vec<StatId>,

    /// Spans the first through the last statement. An empty block is a zero-width location
    /// at the token that terminates it.
    pub location: Location,
}

/// Syntax tree of a whole source file.
#[derive(Clone, Debug)]
pub struct Chunk {
    blocks: Vec<Block>,
    stats: Vec<Stat>,
    exps: Vec<Exp>,

    block_parents: Vec<Option<NodeId>>,
    stat_parents: Vec<Option<NodeId>>,
    exp_parents: Vec<Option<NodeId>>,

    root: BlockId,
}

impl Chunk {
    /// Top-level block of the file.
    pub fn root(&self) -> BlockId {
        self.root
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn stat(&self, id: StatId) -> &Stat {
        &self.stats[id.0]
    }

    pub fn exp(&self, id: ExpId) -> &Exp {
        &self.exps[id.0]
    }

    pub fn location(&self, node: NodeId) -> Location {
        match node {
            NodeId::Block(id) => self.block(id).location,
            NodeId::Stat(id) => self.stat(id).location(),
            NodeId::Exp(id) => self.exp(id).location(),
        }
    }

    /// Direct children of a node, in source order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        match node {
            NodeId::Block(id) => self.block(id).stats.iter().map(|&stat| stat.into()).collect(),
            NodeId::Stat(id) => self.stat(id).children(),
            NodeId::Exp(id) => self.exp(id).children(),
        }
    }

    /// Returns the node that directly contains `node`. The root block has no parent.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        match node {
            NodeId::Block(id) => self.block_parents[id.0],
            NodeId::Stat(id) => self.stat_parents[id.0],
            NodeId::Exp(id) => self.exp_parents[id.0],
        }
    }

    /// Returns the parent of an expression if that parent is an expression too.
    pub fn parent_exp(&self, exp: ExpId) -> Option<ExpId> {
        match self.parent(exp.into()) {
            Some(NodeId::Exp(parent)) => Some(parent),
            _ => None,
        }
    }

    /// Iterates over all ancestors of `node`, nearest first, ending with the root block.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(node);
        std::iter::from_fn(move || {
            let node = current?;
            current = self.parent(node);
            Some(node)
        })
    }

    /// All nodes of the chunk in depth-first pre-order, starting with the root block.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![NodeId::Block(self.root)];
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(node).into_iter().rev());
        }
        result
    }
}

/// Accumulates nodes during parsing and links each child to its parent as soon as the parent
/// is allocated.
#[derive(Debug, Default)]
pub(crate) struct ChunkBuilder {
    blocks: Vec<Block>,
    stats: Vec<Stat>,
    exps: Vec<Exp>,

    block_parents: Vec<Option<NodeId>>,
    stat_parents: Vec<Option<NodeId>>,
    exp_parents: Vec<Option<NodeId>>,
}

impl ChunkBuilder {
    pub fn new() -> ChunkBuilder {
        ChunkBuilder::default()
    }

    pub fn exp(&self, id: ExpId) -> &Exp {
        &self.exps[id.0]
    }

    pub fn stat(&self, id: StatId) -> &Stat {
        &self.stats[id.0]
    }

    pub fn exp_location(&self, id: ExpId) -> Location {
        self.exp(id).location()
    }

    pub fn stat_location(&self, id: StatId) -> Location {
        self.stat(id).location()
    }

    pub fn add_block(&mut self, stats: Vec<StatId>, location: Location) -> BlockId {
        let id = BlockId(self.blocks.len());
        for &stat in &stats {
            self.stat_parents[stat.0] = Some(id.into());
        }
        self.blocks.push(Block { stats, location });
        self.block_parents.push(None);
        id
    }

    pub fn add_stat(&mut self, stat: impl Into<Stat>) -> StatId {
        let stat = stat.into();
        let id = StatId(self.stats.len());
        self.link_children(stat.children(), id.into());
        self.stats.push(stat);
        self.stat_parents.push(None);
        id
    }

    pub fn add_exp(&mut self, exp: impl Into<Exp>) -> ExpId {
        let exp = exp.into();
        let id = ExpId(self.exps.len());
        self.link_children(exp.children(), id.into());
        self.exps.push(exp);
        self.exp_parents.push(None);
        id
    }

    pub fn finish(self, root: BlockId) -> Chunk {
        Chunk {
            blocks: self.blocks,
            stats: self.stats,
            exps: self.exps,
            block_parents: self.block_parents,
            stat_parents: self.stat_parents,
            exp_parents: self.exp_parents,
            root,
        }
    }

    fn link_children(&mut self, children: Vec<NodeId>, parent: NodeId) {
        for child in children {
            let slot = match child {
                NodeId::Block(id) => &mut self.block_parents[id.0],
                NodeId::Stat(id) => &mut self.stat_parents[id.0],
                NodeId::Exp(id) => &mut self.exp_parents[id.0],
            };
            *slot = Some(parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Position;

    fn loc(start: usize, end: usize) -> Location {
        Location::new(Position::new(0, start), Position::new(0, end))
    }

    #[test]
    fn links_parents_on_allocation() {
        let mut builder = ChunkBuilder::new();
        let one = builder.add_exp(IntegerExp {
            value: 1,
            location: loc(4, 5),
        });
        let two = builder.add_exp(IntegerExp {
            value: 2,
            location: loc(8, 9),
        });
        let sum = builder.add_exp(BinopExp {
            operator: BinaryOperator::Add,
            lhs: one,
            rhs: two,
            location: loc(4, 9),
        });
        let stat = builder.add_stat(ReturnStat {
            values: vec![sum],
            location: loc(0, 9),
        });
        let root = builder.add_block(vec![stat], loc(0, 9));
        let chunk = builder.finish(root);

        assert_eq!(chunk.parent_exp(one), Some(sum));
        assert_eq!(chunk.parent(sum.into()), Some(stat.into()));
        assert_eq!(chunk.parent_exp(sum), None);
        assert_eq!(chunk.parent(root.into()), None);

        let ancestors: Vec<NodeId> = chunk.ancestors(two.into()).collect();
        assert_eq!(ancestors, vec![sum.into(), stat.into(), root.into()]);

        let nodes = chunk.nodes();
        assert_eq!(
            nodes,
            vec![root.into(), stat.into(), sum.into(), one.into(), two.into()]
        );
    }
}
