//! Definedness analysis: is a local assigned on every, some, or no path
//! reaching a block?
//!
//! Runs the forward engine in [`crate::fixpoint`] with a three-level
//! lattice. Code generation uses the result to decide which locals need a
//! slot at a block entry and which uses need a runtime "unbound local"
//! check.

use std::fmt;

use pyro_ir::{BlockId, Cfg, CfgBlock, Name};

use crate::classify::{for_each_binding, for_each_param, NameSet};
use crate::fixpoint::{compute_fixed_point, BlockAnalyzer, FixedPoint, StateMap};
use crate::scope::ScopeInfo;

/// How thoroughly a name is assigned at a program point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefinitionLevel {
    /// No reaching path assigns the name.
    Undefined,
    /// Some reaching paths assign the name and some do not.
    PotentiallyDefined,
    /// Every reaching path assigns the name.
    Defined,
}

impl fmt::Display for DefinitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefinitionLevel::Undefined => "undefined",
            DefinitionLevel::PotentiallyDefined => "potentially defined",
            DefinitionLevel::Defined => "defined",
        })
    }
}

/// Transfer and merge rules for definedness.
///
/// `Undefined` is never stored in a state map: a name is either absent or
/// at least potentially defined. Both merge operators assert this.
struct DefinednessAnalyzer;

impl BlockAnalyzer for DefinednessAnalyzer {
    type Value = DefinitionLevel;

    fn transfer(&self, state: &mut StateMap<DefinitionLevel>, cfg: &Cfg, block: &CfgBlock) {
        let mut define = |name: Name| {
            state.insert(name, DefinitionLevel::Defined);
        };
        for stmt in &block.body {
            for_each_binding(stmt, &mut define);
        }
        if block.is_entry() {
            if let Some(args) = cfg.args() {
                for_each_param(args, &mut define);
            }
        }
    }

    fn merge(&self, from: DefinitionLevel, into: DefinitionLevel) -> DefinitionLevel {
        assert!(
            from != DefinitionLevel::Undefined && into != DefinitionLevel::Undefined,
            "merging an undefined state ({from}, {into})"
        );
        if from == DefinitionLevel::PotentiallyDefined || into == DefinitionLevel::PotentiallyDefined
        {
            DefinitionLevel::PotentiallyDefined
        } else {
            DefinitionLevel::Defined
        }
    }

    fn merge_blank(&self, into: DefinitionLevel) -> DefinitionLevel {
        assert!(
            into != DefinitionLevel::Undefined,
            "merging an undefined state with a blank one"
        );
        DefinitionLevel::PotentiallyDefined
    }
}

/// Per-block definedness of every name assigned in a function.
#[derive(Debug)]
pub struct DefinednessAnalysis {
    results: FixedPoint<DefinitionLevel>,
    /// Names with any definition at each block entry, minus names the scope
    /// resolver sends to global lookup. Indexed by `BlockId::index()`.
    defined: Vec<NameSet>,
}

impl DefinednessAnalysis {
    /// Run the analysis to completion.
    pub fn new(cfg: &Cfg, scope: &dyn ScopeInfo) -> Self {
        let results = compute_fixed_point(cfg, &DefinednessAnalyzer);

        let mut defined = vec![NameSet::default(); cfg.len()];
        for (block, state) in results.iter() {
            defined[block.index()] = state
                .keys()
                .copied()
                .filter(|&name| !scope.refers_to_global(name))
                .collect();
        }

        tracing::debug!(
            num_blocks = cfg.len(),
            evaluations = results.evaluations(),
            "definedness computed"
        );

        DefinednessAnalysis { results, defined }
    }

    /// Definedness of `name` on entry to `block`, ignoring scope.
    ///
    /// Names never assigned on a path to `block`, and every name at an
    /// unreachable block, are `Undefined`.
    pub fn is_defined_at(&self, name: Name, block: BlockId) -> DefinitionLevel {
        self.results
            .entry_state(block)
            .and_then(|state| state.get(&name).copied())
            .unwrap_or(DefinitionLevel::Undefined)
    }

    /// Local names at least potentially defined on entry to `block`.
    pub fn defined_names_at(&self, block: BlockId) -> &NameSet {
        &self.defined[block.index()]
    }
}

#[cfg(test)]
mod tests;
