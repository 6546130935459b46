//! Generic forward fixed-point engine over a function's graph.
//!
//! An analysis supplies a per-block transfer function and two merge
//! operators through [`BlockAnalyzer`]; the engine owns the worklist.
//!
//! # Algorithm
//!
//! 1. Seed the entry block with an empty state and queue it.
//! 2. Pop the lowest-numbered queued block, copy its entry state and run
//!    the transfer function on the copy to get its exit state.
//! 3. Merge the exit state into the entry state of each successor:
//!    - first time the successor is reached: take the exit state as is;
//!    - name present on both sides: `merge(exit, entry)`;
//!    - name present on only one side: `merge_blank(value)`, since the other
//!      side reached the block without it.
//! 4. Requeue every successor whose entry state changed; stop when the queue
//!    is empty.
//!
//! Termination relies on the analysis's values only moving up a finite
//! lattice, which every `merge`/`merge_blank` implementation must ensure.
//! Blocks unreachable from the entry are never evaluated and have no state.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::BinaryHeap;
use std::fmt;

use rustc_hash::FxHashMap;

use pyro_ir::{BlockId, Cfg, CfgBlock, Name};

/// Per-name state at one program point.
pub type StateMap<T> = FxHashMap<Name, T>;

/// A forward dataflow problem solvable by [`compute_fixed_point`].
pub trait BlockAnalyzer {
    /// Lattice element tracked per name.
    type Value: Copy + Eq + fmt::Debug;

    /// Apply `block`'s effect to `state`, turning its entry state into its
    /// exit state.
    fn transfer(&self, state: &mut StateMap<Self::Value>, cfg: &Cfg, block: &CfgBlock);

    /// Combine values arriving for the same name from two reached paths.
    fn merge(&self, from: Self::Value, into: Self::Value) -> Self::Value;

    /// Value for a name that arrives along only one of the paths merged so
    /// far.
    fn merge_blank(&self, into: Self::Value) -> Self::Value;
}

/// Converged entry states of every block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPoint<T> {
    /// Indexed by `BlockId::index()`; `None` for unreachable blocks.
    entry_states: Vec<Option<StateMap<T>>>,
    evaluations: usize,
}

impl<T> FixedPoint<T> {
    /// State at the entry of `block`, or `None` if the block is unreachable.
    pub fn entry_state(&self, block: BlockId) -> Option<&StateMap<T>> {
        self.entry_states.get(block.index())?.as_ref()
    }

    /// How many block transfers the engine ran before converging.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Iterate over reachable blocks and their entry states, in block order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &StateMap<T>)> {
        self.entry_states
            .iter()
            .zip(0u32..)
            .filter_map(|(state, raw)| Some((BlockId::new(raw), state.as_ref()?)))
    }
}

/// Run `analyzer` over `cfg` to a fixed point.
pub fn compute_fixed_point<A: BlockAnalyzer>(cfg: &Cfg, analyzer: &A) -> FixedPoint<A::Value> {
    let num_blocks = cfg.len();
    let mut entry_states: Vec<Option<StateMap<A::Value>>> = vec![None; num_blocks];
    let mut in_queue = vec![false; num_blocks];
    let mut queue = BinaryHeap::new();

    entry_states[BlockId::ENTRY.index()] = Some(StateMap::default());
    in_queue[BlockId::ENTRY.index()] = true;
    queue.push(Reverse(BlockId::ENTRY));

    let mut evaluations = 0usize;
    while let Some(Reverse(id)) = queue.pop() {
        evaluations += 1;
        in_queue[id.index()] = false;

        let block = cfg.block(id);
        let mut exit = entry_states[id.index()].clone().unwrap_or_default();
        analyzer.transfer(&mut exit, cfg, block);

        for &succ in &block.successors {
            let changed = merge_into(analyzer, &exit, &mut entry_states[succ.index()]);
            if changed && !in_queue[succ.index()] {
                in_queue[succ.index()] = true;
                queue.push(Reverse(succ));
            }
        }
    }

    tracing::debug!(num_blocks, evaluations, "fixed point reached");

    FixedPoint {
        entry_states,
        evaluations,
    }
}

/// Merge a predecessor's exit state into a successor's entry state.
/// Returns whether the entry state changed.
fn merge_into<A: BlockAnalyzer>(
    analyzer: &A,
    exit: &StateMap<A::Value>,
    slot: &mut Option<StateMap<A::Value>>,
) -> bool {
    let next = match slot {
        Some(next) => next,
        None => {
            *slot = Some(exit.clone());
            return true;
        }
    };

    let mut changed = false;
    for (&name, &value) in exit {
        match next.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(analyzer.merge_blank(value));
                changed = true;
            }
            Entry::Occupied(mut entry) => {
                let merged = analyzer.merge(value, *entry.get());
                if merged != *entry.get() {
                    entry.insert(merged);
                    changed = true;
                }
            }
        }
    }

    for (name, value) in next.iter_mut() {
        if exit.contains_key(name) {
            continue;
        }
        let merged = analyzer.merge_blank(*value);
        if merged != *value {
            *value = merged;
            changed = true;
        }
    }

    changed
}
