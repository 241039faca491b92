//! Block index nodes and ancestor lookup
//!
//! A [`BlockIndex`] is one block's position in the chain. Nodes refer to
//! their parent by [`BlockId`], an index into whatever collaborator owns the
//! full set of nodes; the retarget engine only borrows them through the
//! [`ChainIndex`] trait and never mutates them.

use crate::consensus::work::block_proof;
use crate::error::ChainIndexError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Position of a node inside its owning index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub usize);

/// One block's header-derived state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIndex {
    /// Height in the chain (genesis is 0)
    pub height: u32,
    /// Header timestamp
    pub time: i64,
    /// Compact target claimed by the header
    pub bits: u32,
    /// Total work of the chain up to and including this block
    pub chain_work: U256,
    /// Parent block, `None` for genesis or a detached node
    pub prev: Option<BlockId>,
}

impl BlockIndex {
    /// Create a node with no ancestor and zero chain work
    pub fn new(height: u32, time: i64, bits: u32) -> Self {
        Self {
            height,
            time,
            bits,
            chain_work: U256::zero(),
            prev: None,
        }
    }

    /// Work contributed by this block alone
    pub fn block_proof(&self) -> U256 {
        block_proof(self.bits)
    }
}

/// Read access to a chain of block index nodes
pub trait ChainIndex {
    /// Look up a node by id
    fn get(&self, id: BlockId) -> Option<&BlockIndex>;

    /// Immediate ancestor of `node`
    fn prev(&self, node: &BlockIndex) -> Option<&BlockIndex> {
        node.prev.and_then(|id| self.get(id))
    }

    /// Ancestor of `node` at `height`, or `node` itself at its own height
    fn ancestor<'a>(&'a self, node: &'a BlockIndex, height: u32) -> Option<&'a BlockIndex> {
        if height > node.height {
            return None;
        }

        let mut current = node;
        while current.height > height {
            current = self.prev(current)?;
        }
        Some(current)
    }
}

/// In-memory chain index
///
/// Heights, parent links and cumulative work are assigned on insert:
/// `work(n) = work(parent) + block_proof(n.bits)`, with genesis carrying its
/// own block proof.
#[derive(Debug, Clone, Default)]
pub struct ChainArena {
    nodes: Vec<BlockIndex>,
}

impl ChainArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Insert a node on top of `parent` (or as a genesis block)
    pub fn insert(
        &mut self,
        parent: Option<BlockId>,
        time: i64,
        bits: u32,
    ) -> Result<BlockId, ChainIndexError> {
        let (height, parent_work) = match parent {
            Some(id) => {
                let parent_node = self
                    .nodes
                    .get(id.0)
                    .ok_or(ChainIndexError::UnknownParent(id.0))?;
                (parent_node.height + 1, parent_node.chain_work)
            }
            None => (0, U256::zero()),
        };
        Ok(self.append(parent, height, parent_work, time, bits))
    }

    /// Append a node on top of the most recently inserted one
    pub fn push(&mut self, time: i64, bits: u32) -> BlockId {
        let parent = self.nodes.len().checked_sub(1).map(BlockId);
        let (height, parent_work) = match parent.and_then(|id| self.nodes.get(id.0)) {
            Some(node) => (node.height + 1, node.chain_work),
            None => (0, U256::zero()),
        };
        self.append(parent, height, parent_work, time, bits)
    }

    fn append(
        &mut self,
        parent: Option<BlockId>,
        height: u32,
        parent_work: U256,
        time: i64,
        bits: u32,
    ) -> BlockId {
        let id = BlockId(self.nodes.len());
        self.nodes.push(BlockIndex {
            height,
            time,
            bits,
            chain_work: parent_work.saturating_add(block_proof(bits)),
            prev: parent,
        });
        id
    }

    /// Most recently inserted node
    pub fn last(&self) -> Option<&BlockIndex> {
        self.nodes.last()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &BlockIndex> {
        self.nodes.iter()
    }
}

impl ChainIndex for ChainArena {
    fn get(&self, id: BlockId) -> Option<&BlockIndex> {
        self.nodes.get(id.0)
    }
}
