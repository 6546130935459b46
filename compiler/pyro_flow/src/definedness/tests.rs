use pretty_assertions::assert_eq;
use pyro_ir::{Arguments, Expr, ExprContext, Stmt};

use crate::classify::NameSet;
use crate::fixpoint::BlockAnalyzer;
use crate::scope::DeclaredGlobals;
use crate::test_helpers::{
    b, chain, make_cfg, make_cfg_with_args, n, params, read, set, DIAMOND, LOOP,
};

use super::DefinitionLevel::{Defined, PotentiallyDefined, Undefined};
use super::{DefinednessAnalysis, DefinednessAnalyzer};

fn analyze(cfg: &pyro_ir::Cfg) -> DefinednessAnalysis {
    DefinednessAnalysis::new(cfg, &DeclaredGlobals::from_cfg(cfg))
}

fn names(raw: &[u32]) -> NameSet {
    raw.iter().map(|&x| n(x)).collect()
}

#[test]
fn straight_line_assignment_is_defined_downstream() {
    let cfg = make_cfg(vec![vec![set(1)], vec![], vec![read(1)]], &chain(3));
    let result = analyze(&cfg);

    // Entry state describes the block's *entry*: nothing is defined yet.
    assert_eq!(result.is_defined_at(n(1), b(0)), Undefined);
    assert_eq!(result.is_defined_at(n(1), b(1)), Defined);
    assert_eq!(result.is_defined_at(n(1), b(2)), Defined);
    assert_eq!(result.defined_names_at(b(2)), &names(&[1]));
}

#[test]
fn one_armed_assignment_is_potentially_defined_at_merge() {
    let cfg = make_cfg(
        vec![vec![], vec![set(1)], vec![Stmt::Pass], vec![read(1)]],
        DIAMOND,
    );
    let result = analyze(&cfg);

    assert_eq!(result.is_defined_at(n(1), b(1)), Undefined);
    assert_eq!(result.is_defined_at(n(1), b(3)), PotentiallyDefined);
    assert_eq!(result.defined_names_at(b(3)), &names(&[1]));
}

#[test]
fn both_arms_assigning_is_defined_at_merge() {
    let cfg = make_cfg(
        vec![vec![], vec![set(1)], vec![set(1)], vec![read(1)]],
        DIAMOND,
    );
    let result = analyze(&cfg);
    assert_eq!(result.is_defined_at(n(1), b(3)), Defined);
}

#[test]
fn loop_body_assignment_is_potentially_defined_at_header_and_exit() {
    let cfg = make_cfg(
        vec![vec![], vec![Stmt::Pass], vec![set(1)], vec![read(1)]],
        LOOP,
    );
    let result = analyze(&cfg);

    assert_eq!(result.is_defined_at(n(1), b(1)), PotentiallyDefined);
    assert_eq!(result.is_defined_at(n(1), b(2)), PotentiallyDefined);
    assert_eq!(result.is_defined_at(n(1), b(3)), PotentiallyDefined);
}

#[test]
fn assignment_before_loop_stays_defined_through_it() {
    let cfg = make_cfg(
        vec![vec![set(1)], vec![Stmt::Pass], vec![set(1)], vec![read(1)]],
        LOOP,
    );
    let result = analyze(&cfg);

    assert_eq!(result.is_defined_at(n(1), b(1)), Defined);
    assert_eq!(result.is_defined_at(n(1), b(3)), Defined);
}

#[test]
fn read_then_write_is_defined_after_the_block() {
    // 0: print x; x = 1 -> 1
    let cfg = make_cfg(vec![vec![read(1), set(1)], vec![]], &chain(2));
    let result = analyze(&cfg);

    assert_eq!(result.is_defined_at(n(1), b(0)), Undefined);
    assert_eq!(result.is_defined_at(n(1), b(1)), Defined);
}

#[test]
fn parameters_are_defined_after_the_entry_block() {
    let args = Arguments {
        vararg: Some(n(2)),
        kwarg: Some(n(3)),
        ..params(&[1])
    };
    let cfg = make_cfg_with_args(args, vec![vec![], vec![]], &chain(2));
    let result = analyze(&cfg);

    for x in 1..=3 {
        assert_eq!(result.is_defined_at(n(x), b(1)), Defined);
    }
    assert_eq!(result.defined_names_at(b(1)), &names(&[1, 2, 3]));
}

#[test]
fn attribute_assignment_defines_nothing() {
    let attr = Stmt::Assign {
        targets: vec![Expr::attribute(
            Expr::load(n(1)),
            n(2),
            ExprContext::Store,
        )],
        value: Expr::Num(0),
    };
    let cfg = make_cfg(vec![vec![attr], vec![]], &chain(2));
    let result = analyze(&cfg);

    assert_eq!(result.is_defined_at(n(1), b(1)), Undefined);
    assert_eq!(result.is_defined_at(n(2), b(1)), Undefined);
    assert!(result.defined_names_at(b(1)).is_empty());
}

#[test]
fn globals_are_filtered_from_defined_names_but_not_levels() {
    let cfg = make_cfg(
        vec![vec![Stmt::Global { names: vec![n(1)] }, set(1), set(2)], vec![]],
        &chain(2),
    );
    let result = analyze(&cfg);

    assert_eq!(result.is_defined_at(n(1), b(1)), Defined);
    assert_eq!(result.defined_names_at(b(1)), &names(&[2]));
}

#[test]
fn unreachable_block_has_nothing_defined() {
    let cfg = make_cfg(vec![vec![set(1)], vec![set(2)], vec![]], &[(0, 2), (1, 2)]);
    let result = analyze(&cfg);

    assert_eq!(result.is_defined_at(n(1), b(1)), Undefined);
    assert!(result.defined_names_at(b(1)).is_empty());
    // Block 1 never runs, so its assignment never reaches block 2.
    assert_eq!(result.is_defined_at(n(2), b(2)), Undefined);
    assert_eq!(result.is_defined_at(n(1), b(2)), Defined);
}

#[test]
fn merge_keeps_potential_over_definite() {
    let analyzer = DefinednessAnalyzer;

    assert_eq!(analyzer.merge(Defined, Defined), Defined);
    assert_eq!(analyzer.merge(Defined, PotentiallyDefined), PotentiallyDefined);
    assert_eq!(analyzer.merge(PotentiallyDefined, Defined), PotentiallyDefined);
    assert_eq!(analyzer.merge_blank(Defined), PotentiallyDefined);
    assert_eq!(analyzer.merge_blank(PotentiallyDefined), PotentiallyDefined);
}

#[test]
#[should_panic(expected = "merging an undefined state")]
fn merging_undefined_is_fatal() {
    let _ = DefinednessAnalyzer.merge(Undefined, Defined);
}

#[test]
fn display_names_levels() {
    assert_eq!(Undefined.to_string(), "undefined");
    assert_eq!(PotentiallyDefined.to_string(), "potentially defined");
    assert_eq!(Defined.to_string(), "defined");
}
