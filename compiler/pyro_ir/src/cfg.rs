//! Control-flow graph of one function.
//!
//! # Architecture
//!
//! Blocks live in an arena (`Vec<CfgBlock>`) and refer to each other by
//! [`BlockId`]. Predecessor and successor lists are ordered and hold ids,
//! never references, so the graph can contain loops without any cycle in
//! ownership. Block 0 is the entry block; the function's formal
//! [`Arguments`] belong to it.
//!
//! Graphs are assembled with [`CfgBuilder`], which keeps both edge
//! directions in sync and validates the result. Once built, a [`Cfg`] is
//! immutable.

use smallvec::SmallVec;

use crate::ast::{Arguments, Stmt};

/// Basic block ID within a function's [`Cfg`].
///
/// IDs are allocated sequentially starting from 0, so they double as
/// indices into the block arena and into per-block analysis tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    /// The entry block.
    pub const ENTRY: BlockId = BlockId(0);

    /// Create a new block ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered edge list. Blocks rarely have more than two edges either way.
pub type BlockEdges = SmallVec<[BlockId; 2]>;

/// A basic block: straight-line statements plus its edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CfgBlock {
    pub id: BlockId,
    pub body: Vec<Stmt>,
    pub predecessors: BlockEdges,
    pub successors: BlockEdges,
}

impl CfgBlock {
    fn new(id: BlockId) -> Self {
        CfgBlock {
            id,
            body: Vec::new(),
            predecessors: BlockEdges::new(),
            successors: BlockEdges::new(),
        }
    }

    /// Whether this is the function's entry block.
    #[inline]
    pub fn is_entry(&self) -> bool {
        self.id == BlockId::ENTRY
    }
}

/// A validated control-flow graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cfg {
    blocks: Vec<CfgBlock>,
    args: Option<Arguments>,
}

impl Cfg {
    /// The entry block.
    #[inline]
    pub fn entry(&self) -> &CfgBlock {
        &self.blocks[BlockId::ENTRY.index()]
    }

    /// Look up a block by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this graph.
    #[inline]
    pub fn block(&self, id: BlockId) -> &CfgBlock {
        &self.blocks[id.index()]
    }

    /// All blocks in id order.
    #[inline]
    pub fn blocks(&self) -> &[CfgBlock] {
        &self.blocks
    }

    /// Number of blocks (always at least 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`: `CfgBuilder::build` rejects empty graphs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The function's parameter list, if it has one.
    #[inline]
    pub fn args(&self) -> Option<&Arguments> {
        self.args.as_ref()
    }
}

/// Errors detected while assembling a [`Cfg`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CfgError {
    #[error("control-flow graph has no blocks")]
    Empty,
    #[error("entry block has a predecessor ({0:?})")]
    EntryHasPredecessors(BlockId),
    #[error("duplicate edge {from:?} -> {to:?}")]
    DuplicateEdge { from: BlockId, to: BlockId },
    #[error("reference to unknown block {0:?}")]
    UnknownBlock(BlockId),
}

/// Incremental builder for [`Cfg`].
///
/// Blocks are numbered in creation order; the first block created is the
/// entry. Edge order is insertion order on both ends.
#[derive(Debug, Default)]
pub struct CfgBuilder {
    blocks: Vec<CfgBlock>,
    args: Option<Arguments>,
    edges: Vec<(BlockId, BlockId)>,
}

impl CfgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the function's parameter list to the entry block.
    #[must_use]
    pub fn with_args(mut self, args: Arguments) -> Self {
        self.args = Some(args);
        self
    }

    /// Append an empty block and return its id.
    pub fn add_block(&mut self) -> BlockId {
        let raw = u32::try_from(self.blocks.len())
            .unwrap_or_else(|_| panic!("function has more than u32::MAX blocks"));
        let id = BlockId::new(raw);
        self.blocks.push(CfgBlock::new(id));
        id
    }

    /// Append a statement to `block`.
    ///
    /// # Panics
    /// Panics if `block` was not created by this builder.
    pub fn push(&mut self, block: BlockId, stmt: Stmt) {
        match self.blocks.get_mut(block.index()) {
            Some(b) => b.body.push(stmt),
            None => panic!("push into unknown block {block:?}"),
        }
    }

    /// Record the edge `from -> to`. Checked in [`CfgBuilder::build`].
    pub fn connect(&mut self, from: BlockId, to: BlockId) {
        self.edges.push((from, to));
    }

    /// Validate and freeze the graph.
    pub fn build(self) -> Result<Cfg, CfgError> {
        let CfgBuilder {
            mut blocks,
            args,
            edges,
        } = self;

        if blocks.is_empty() {
            return Err(CfgError::Empty);
        }

        let num_blocks = blocks.len();
        let check = |id: BlockId| {
            if id.index() < num_blocks {
                Ok(id)
            } else {
                Err(CfgError::UnknownBlock(id))
            }
        };

        for (from, to) in edges {
            check(from)?;
            check(to)?;
            if to == BlockId::ENTRY {
                return Err(CfgError::EntryHasPredecessors(from));
            }
            if blocks[from.index()].successors.contains(&to) {
                return Err(CfgError::DuplicateEdge { from, to });
            }
            blocks[from.index()].successors.push(to);
            blocks[to.index()].predecessors.push(from);
        }

        for block in &blocks {
            for target in block.body.iter().flat_map(Stmt::jump_targets) {
                check(target)?;
            }
        }

        Ok(Cfg { blocks, args })
    }
}
