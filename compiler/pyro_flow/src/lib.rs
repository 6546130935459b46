//! Function dataflow analyses for Pyro.
//!
//! Given one function's control-flow graph, this crate answers the three
//! questions code generation needs before it can materialize locals:
//!
//! - **Definedness** ([`DefinednessAnalysis`]): on entry to each block, is a
//!   local [`Defined`](DefinitionLevel::Defined) on every path,
//!   [`PotentiallyDefined`](DefinitionLevel::PotentiallyDefined) on some, or
//!   [`Undefined`](DefinitionLevel::Undefined)?
//! - **Liveness** ([`LivenessAnalysis`]): can a local's value still be read
//!   after a block?
//! - **Phi placement** ([`PhiAnalysis`]): which locals must be reconciled at
//!   each merge block, and which uses need a runtime definedness check?
//!
//! # Pipeline
//!
//! ```text
//! classify ──► liveness ─────────────┐
//!     │                              ▼
//!     └──────► fixpoint ─► definedness ─► phi
//! ```
//!
//! All analyses run eagerly at construction, single-threaded, and borrow the
//! graph for their whole lifetime. Each is built once per compiled function
//! and dropped after code generation.
//!
//! # Crate Dependencies
//!
//! `pyro_flow` depends only on `pyro_ir` for names, syntax nodes and the
//! graph. Scope resolution is consumed through the [`ScopeInfo`] trait.

pub mod classify;
pub mod definedness;
pub mod fixpoint;
pub mod liveness;
pub mod phi;
pub mod scope;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

use pyro_ir::Cfg;

pub use classify::{for_each_binding, for_each_param, BlockEffects, NameSet};
pub use definedness::{DefinednessAnalysis, DefinitionLevel};
pub use fixpoint::{compute_fixed_point, BlockAnalyzer, FixedPoint, StateMap};
pub use liveness::LivenessAnalysis;
pub use phi::{PhiAnalysis, PhiLiveness, PhiOptions};
pub use scope::{DeclaredGlobals, ScopeInfo};

/// Build the liveness oracle for `cfg`.
pub fn compute_liveness_info(cfg: &Cfg) -> LivenessAnalysis<'_> {
    LivenessAnalysis::new(cfg)
}

/// Compute definedness and phi requirements for `cfg` with default options.
pub fn compute_required_phis<'a>(
    cfg: &'a Cfg,
    liveness: &LivenessAnalysis<'_>,
    scope: &dyn ScopeInfo,
) -> PhiAnalysis<'a> {
    PhiAnalysis::new(cfg, liveness, scope, PhiOptions::default())
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set,
/// e.g. `RUST_LOG=pyro_flow=debug` or `RUST_LOG=pyro_flow=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed (e.g. by a host
            // binary); keep it.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
