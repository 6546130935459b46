//! Phi placement: which locals must be reconciled where control merges.
//!
//! A local needs a phi at a merge block (two or more predecessors) when it
//! may hold a value on entry there and that value can still be read
//! afterwards. Definedness answers the first half, the liveness oracle the
//! second. The resulting per-block sets are what code generation consults
//! when it emits the jump out of each predecessor.

use pyro_ir::{BlockId, Cfg, Name};

use crate::classify::NameSet;
use crate::definedness::{DefinednessAnalysis, DefinitionLevel};
use crate::liveness::LivenessAnalysis;
use crate::scope::ScopeInfo;

/// Which predecessors of a merge block are asked whether a name is live.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PhiLiveness {
    /// Ask only the first predecessor.
    ///
    /// Every predecessor of a merge block reaches the same code from the
    /// merge point onward, so liveness at the end of any one of them is
    /// normally representative.
    #[default]
    FirstPredecessor,
    /// Require a phi if the name is live at the end of any predecessor.
    AnyPredecessor,
}

/// Knobs for [`PhiAnalysis`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PhiOptions {
    /// Predecessors consulted for liveness at a merge block.
    pub liveness: PhiLiveness,
}

/// Phi requirements for one function.
pub struct PhiAnalysis<'a> {
    cfg: &'a Cfg,
    definedness: DefinednessAnalysis,
    /// Required names per block, indexed by `BlockId::index()`. Empty for
    /// blocks with fewer than two predecessors.
    required_phis: Vec<NameSet>,
    empty: NameSet,
}

impl<'a> PhiAnalysis<'a> {
    /// Run definedness and compute the phi set of every merge block.
    pub fn new(
        cfg: &'a Cfg,
        liveness: &LivenessAnalysis<'_>,
        scope: &dyn ScopeInfo,
        options: PhiOptions,
    ) -> Self {
        let definedness = DefinednessAnalysis::new(cfg, scope);
        let mut required_phis = vec![NameSet::default(); cfg.len()];

        for block in cfg.blocks() {
            if block.predecessors.len() < 2 {
                continue;
            }

            let defined = definedness.defined_names_at(block.id);
            let required: NameSet = defined
                .iter()
                .copied()
                .filter(|&name| match options.liveness {
                    PhiLiveness::FirstPredecessor => {
                        liveness.is_live_at_end(name, block.predecessors[0])
                    }
                    PhiLiveness::AnyPredecessor => block
                        .predecessors
                        .iter()
                        .any(|&pred| liveness.is_live_at_end(name, pred)),
                })
                .collect();

            tracing::trace!(
                block = block.id.raw(),
                defined = defined.len(),
                required = required.len(),
                "phi requirements"
            );
            required_phis[block.id.index()] = required;
        }

        tracing::debug!(
            num_blocks = cfg.len(),
            merge_blocks = cfg
                .blocks()
                .iter()
                .filter(|block| block.predecessors.len() >= 2)
                .count(),
            ?options,
            "phi analysis complete"
        );

        PhiAnalysis {
            cfg,
            definedness,
            required_phis,
            empty: NameSet::default(),
        }
    }

    /// Does `block` need a phi for `name`?
    pub fn is_required(&self, name: Name, block: BlockId) -> bool {
        self.required_phis[block.index()].contains(&name)
    }

    /// Does the jump out of `block` feed a phi for `name`?
    ///
    /// Only single-successor blocks can: a branch never jumps straight into
    /// a merge block that needs phis.
    pub fn is_required_after(&self, name: Name, block: BlockId) -> bool {
        match self.cfg.block(block).successors.as_slice() {
            &[succ] => self.is_required(name, succ),
            _ => false,
        }
    }

    /// All phis fed by the jump out of `block` (those of its first
    /// successor). Empty for exit blocks.
    pub fn all_required_after(&self, block: BlockId) -> &NameSet {
        match self.cfg.block(block).successors.first() {
            Some(succ) => &self.required_phis[succ.index()],
            None => &self.empty,
        }
    }

    /// Local names at least potentially defined on entry to `block`.
    pub fn all_defined_at(&self, block: BlockId) -> &NameSet {
        self.definedness.defined_names_at(block)
    }

    /// Must code generation guard a use of `name` after `block` with a
    /// runtime definedness check?
    ///
    /// # Panics
    /// Panics if `block` has no successors, or if `name` is not assigned on
    /// any path to its first successor.
    pub fn is_potentially_undefined_after(&self, name: Name, block: BlockId) -> bool {
        let Some(&succ) = self.cfg.block(block).successors.first() else {
            panic!("is_potentially_undefined_after: block {block:?} has no successors")
        };
        let level = self.definedness.is_defined_at(name, succ);
        assert!(
            level != DefinitionLevel::Undefined,
            "{name:?} is undefined on entry to {succ:?} (after {block:?})"
        );
        level == DefinitionLevel::PotentiallyDefined
    }

    /// The definedness results this analysis was built from.
    pub fn definedness(&self) -> &DefinednessAnalysis {
        &self.definedness
    }
}
