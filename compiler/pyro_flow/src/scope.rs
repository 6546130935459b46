//! Scope resolution as seen by the flow analyses.
//!
//! The analyses only need to know which names bypass local slots entirely.
//! Deciding that is the scope resolver's job; [`ScopeInfo`] is the seam.

use pyro_ir::{Cfg, Name, Stmt};

use crate::classify::NameSet;

/// Scope predicate for the function being analyzed.
pub trait ScopeInfo {
    /// Does `name` resolve to a global (or other non-local) binding?
    fn refers_to_global(&self, name: Name) -> bool;
}

/// Names declared `global` in a function body, plus any names added by the
/// caller.
#[derive(Clone, Debug, Default)]
pub struct DeclaredGlobals {
    names: NameSet,
}

impl DeclaredGlobals {
    /// An empty set: every name is local.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `global` declaration in the function's own blocks.
    /// Nested function and class bodies declare their own globals.
    pub fn from_cfg(cfg: &Cfg) -> Self {
        let names = cfg
            .blocks()
            .iter()
            .flat_map(|block| &block.body)
            .filter_map(|stmt| match stmt {
                Stmt::Global { names } => Some(names),
                _ => None,
            })
            .flatten()
            .copied()
            .collect();
        DeclaredGlobals { names }
    }

    /// Mark `name` global. Returns `false` if it already was.
    pub fn insert(&mut self, name: Name) -> bool {
        self.names.insert(name)
    }

    /// Whether `name` was declared or inserted as global.
    pub fn contains(&self, name: Name) -> bool {
        self.names.contains(&name)
    }
}

impl ScopeInfo for DeclaredGlobals {
    fn refers_to_global(&self, name: Name) -> bool {
        self.contains(name)
    }
}
