//! Pyro IR - inputs to the function dataflow analyses
//!
//! This crate contains the data the analyses in `pyro_flow` consume:
//! - Names for interned identifiers
//! - Syntax nodes (statements and expressions) stored in basic blocks
//! - The arena-based control-flow graph of one function
//!
//! Graphs are built once per function and are immutable afterwards; every
//! analysis borrows them.

pub mod ast;
pub mod cfg;
mod interner;
mod name;

pub use ast::{Alias, Arguments, BinaryOp, CmpOp, Expr, ExprContext, Stmt};
pub use cfg::{BlockEdges, BlockId, Cfg, CfgBlock, CfgBuilder, CfgError};
pub use interner::{InternError, StringInterner};
pub use name::Name;
