//! Forward-search liveness oracle.
//!
//! Answers one question: after `block` finishes, can the current value of
//! `name` still be read along some path? There is no liveness table; each
//! query walks the graph forward from the block's successors.
//!
//! # Algorithm
//!
//! Breadth-first search from every successor of the queried block, visiting
//! each block at most once:
//!
//! 1. If the block reads `name` before writing it, the name is live.
//! 2. If the block writes `name` before reading it, the value flowing into
//!    that block is dead along this path; do not follow its successors.
//! 3. Otherwise keep searching through its successors.
//!
//! A block with no successors is the function exit: nothing is live there.
//!
//! Per-block read/write sets are computed once when the oracle is built and
//! reused across queries. Query answers are not cached.

use std::collections::VecDeque;

use pyro_ir::{BlockId, Cfg, Name};

use crate::classify::BlockEffects;

/// Liveness oracle for one function's graph.
pub struct LivenessAnalysis<'a> {
    cfg: &'a Cfg,
    /// Read/write sets, indexed by `BlockId::index()`.
    effects: Vec<BlockEffects>,
}

impl<'a> LivenessAnalysis<'a> {
    /// Classify every block of `cfg` up front.
    pub fn new(cfg: &'a Cfg) -> Self {
        let effects = cfg
            .blocks()
            .iter()
            .map(|block| BlockEffects::of_block(cfg, block))
            .collect();

        tracing::debug!(num_blocks = cfg.len(), "liveness oracle ready");

        LivenessAnalysis { cfg, effects }
    }

    /// Is `name` read on some path leaving `block` before being rebound?
    pub fn is_live_at_end(&self, name: Name, block: BlockId) -> bool {
        let successors = &self.cfg.block(block).successors;
        if successors.is_empty() {
            return false;
        }

        let mut visited = vec![false; self.cfg.len()];
        let mut queue: VecDeque<BlockId> = successors.iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            if std::mem::replace(&mut visited[current.index()], true) {
                continue;
            }

            let effects = &self.effects[current.index()];
            if effects.reads().contains(&name) {
                tracing::trace!(
                    name = name.raw(),
                    from = block.raw(),
                    read_in = current.raw(),
                    "live at end"
                );
                return true;
            }
            if !effects.writes().contains(&name) {
                queue.extend(self.cfg.block(current).successors.iter().copied());
            }
        }

        false
    }
}
