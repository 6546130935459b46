//! Shared test utilities for the flow analyses.
//!
//! Names are minted with `Name::from_raw` so tests need no interner; blocks
//! are described as statement lists plus an edge list. Only compiled in test
//! builds.

use pyro_ir::{Arguments, BlockId, Cfg, CfgBuilder, Expr, Name, Stmt};

/// Shorthand for a test variable name.
pub(crate) fn n(raw: u32) -> Name {
    Name::from_raw(raw)
}

/// Shorthand for `BlockId::new(raw)`.
pub(crate) fn b(raw: u32) -> BlockId {
    BlockId::new(raw)
}

/// `x = <int>`
pub(crate) fn set(x: u32) -> Stmt {
    Stmt::assign(n(x), Expr::Num(1))
}

/// `x = y`
pub(crate) fn copy(x: u32, y: u32) -> Stmt {
    Stmt::assign(n(x), Expr::load(n(y)))
}

/// `print x`
pub(crate) fn read(x: u32) -> Stmt {
    Stmt::Print {
        dest: None,
        values: vec![Expr::load(n(x))],
        nl: true,
    }
}

/// Parameter list with plain positional parameters.
pub(crate) fn params(names: &[u32]) -> Arguments {
    Arguments {
        args: names.iter().map(|&x| Expr::param(n(x))).collect(),
        ..Arguments::default()
    }
}

/// Build a graph from per-block statements and `(from, to)` edges.
pub(crate) fn make_cfg(blocks: Vec<Vec<Stmt>>, edges: &[(u32, u32)]) -> Cfg {
    build(CfgBuilder::new(), blocks, edges)
}

/// Like [`make_cfg`], with a parameter list on the entry block.
pub(crate) fn make_cfg_with_args(
    args: Arguments,
    blocks: Vec<Vec<Stmt>>,
    edges: &[(u32, u32)],
) -> Cfg {
    build(CfgBuilder::new().with_args(args), blocks, edges)
}

fn build(mut builder: CfgBuilder, blocks: Vec<Vec<Stmt>>, edges: &[(u32, u32)]) -> Cfg {
    crate::init_tracing();
    for body in blocks {
        let id = builder.add_block();
        for stmt in body {
            builder.push(id, stmt);
        }
    }
    for &(from, to) in edges {
        builder.connect(b(from), b(to));
    }
    match builder.build() {
        Ok(cfg) => cfg,
        Err(e) => panic!("invalid test graph: {e}"),
    }
}

/// Straight line `0 -> 1 -> ... -> len-1`.
pub(crate) fn chain(len: u32) -> Vec<(u32, u32)> {
    (1..len).map(|i| (i - 1, i)).collect()
}

/// Diamond: `0 -> {1, 2} -> 3`.
pub(crate) const DIAMOND: &[(u32, u32)] = &[(0, 1), (0, 2), (1, 3), (2, 3)];

/// Loop: `0 -> 1 (header) -> 2 (body) -> 1`, `1 -> 3 (exit)`.
pub(crate) const LOOP: &[(u32, u32)] = &[(0, 1), (1, 2), (2, 1), (1, 3)];
