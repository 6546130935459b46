//! Per-block read/write classification of names.
//!
//! Two walks live here:
//!
//! - [`BlockEffects`] walks every statement of a block in execution order
//!   and records which names the block *reads* before writing them and which
//!   it *writes* before reading them. Liveness uses these sets.
//! - [`for_each_binding`] / [`for_each_param`] report only the names a
//!   statement or parameter list binds, with no read bookkeeping. Definedness
//!   uses these.
//!
//! Nested function and class bodies are never entered: they are separate
//! scopes and get analyzed on their own.

use rustc_hash::FxHashSet;

use pyro_ir::{Arguments, Cfg, CfgBlock, Expr, ExprContext, Name, Stmt};

/// Set of names. Used for read/write sets and per-block analysis results.
pub type NameSet = FxHashSet<Name>;

/// Names a single block reads and writes.
///
/// Reads and writes are exclusive per block: once a name is written, later
/// reads of it in the same block see the block's own value and are not
/// recorded; once a name is read, a later write does not hide that read and
/// is not recorded as a write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockEffects {
    reads: NameSet,
    writes: NameSet,
}

impl BlockEffects {
    /// Classify one block. The entry block also binds the function's
    /// parameters, ahead of its first statement.
    pub fn of_block(cfg: &Cfg, block: &CfgBlock) -> Self {
        let mut effects = BlockEffects::default();
        if block.is_entry() {
            if let Some(args) = cfg.args() {
                for_each_param(args, &mut |name| effects.store(name));
            }
        }
        for stmt in &block.body {
            effects.visit_stmt(stmt);
        }
        effects
    }

    /// Classify a bare statement list (no parameters).
    pub fn of_stmts(stmts: &[Stmt]) -> Self {
        let mut effects = BlockEffects::default();
        for stmt in stmts {
            effects.visit_stmt(stmt);
        }
        effects
    }

    /// Names read before any write in this block.
    #[inline]
    pub fn reads(&self) -> &NameSet {
        &self.reads
    }

    /// Names written before any read in this block.
    #[inline]
    pub fn writes(&self) -> &NameSet {
        &self.writes
    }

    fn load(&mut self, name: Name) {
        if !self.writes.contains(&name) {
            self.reads.insert(name);
        }
    }

    fn store(&mut self, name: Name) {
        if !self.reads.contains(&name) {
            self.writes.insert(name);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { targets, value } => {
                self.visit_expr(value);
                for target in targets {
                    self.visit_target(target);
                }
            }
            Stmt::ClassDef { name, bases, .. } => {
                for base in bases {
                    self.visit_expr(base);
                }
                self.store(*name);
            }
            Stmt::FunctionDef {
                name,
                args,
                decorators,
                ..
            } => {
                for expr in decorators.iter().chain(&args.defaults) {
                    self.visit_expr(expr);
                }
                self.store(*name);
            }
            Stmt::Import { names } => {
                for alias in names {
                    self.store(alias.bound_name());
                }
            }
            Stmt::Branch { test, .. } => self.visit_expr(test),
            Stmt::Expr(expr) | Stmt::Return(Some(expr)) => self.visit_expr(expr),
            Stmt::Print { dest, values, .. } => {
                for expr in dest.iter().chain(values) {
                    self.visit_expr(expr);
                }
            }
            Stmt::Jump { .. } | Stmt::Pass | Stmt::Return(None) | Stmt::Global { .. } => {}
        }
    }

    fn visit_target(&mut self, target: &Expr) {
        match target {
            Expr::Name { .. } => self.visit_expr(target),
            // Mutating an existing object reads the object; nothing is bound.
            Expr::Attribute { value, .. } => self.visit_expr(value),
            Expr::Subscript { value, slice, .. } => {
                self.visit_expr(value);
                self.visit_expr(slice);
            }
            Expr::Tuple { elts, .. } | Expr::List { elts, .. } => {
                for elt in elts {
                    self.visit_target(elt);
                }
            }
            _ => invalid_target(target),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Name { id, ctx } => match ctx {
                ExprContext::Load => self.load(*id),
                ExprContext::Store => self.store(*id),
                ExprContext::Del | ExprContext::Param => {
                    panic!("name reference {id:?} has context {ctx:?}, expected Load or Store")
                }
            },
            Expr::Attribute { value, .. } => self.visit_expr(value),
            Expr::Subscript { value, slice, .. } => {
                self.visit_expr(value);
                self.visit_expr(slice);
            }
            Expr::Tuple { elts, .. } | Expr::List { elts, .. } => {
                for elt in elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Call { func, args } => {
                self.visit_expr(func);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::BinOp { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Compare {
                left, comparators, ..
            } => {
                self.visit_expr(left);
                for expr in comparators {
                    self.visit_expr(expr);
                }
            }
            Expr::Num(_) | Expr::Str(_) => {}
        }
    }
}

/// Report every name `stmt` binds in the current scope.
///
/// Assignment targets bind plain names and recurse into tuple/list targets;
/// attribute and subscript targets bind nothing. Class and function
/// definitions bind their name, imports bind their alias (or the imported
/// name). Every other statement binds nothing.
pub fn for_each_binding(stmt: &Stmt, f: &mut impl FnMut(Name)) {
    match stmt {
        Stmt::Assign { targets, .. } => {
            for target in targets {
                for_each_target(target, f);
            }
        }
        Stmt::ClassDef { name, .. } | Stmt::FunctionDef { name, .. } => f(*name),
        Stmt::Import { names } => {
            for alias in names {
                f(alias.bound_name());
            }
        }
        Stmt::Branch { .. }
        | Stmt::Jump { .. }
        | Stmt::Expr(_)
        | Stmt::Pass
        | Stmt::Return(_)
        | Stmt::Print { .. }
        | Stmt::Global { .. } => {}
    }
}

/// Report every name a parameter list binds: `**kwarg`, `*vararg`, then the
/// positional parameters (destructuring nested tuples).
pub fn for_each_param(args: &Arguments, f: &mut impl FnMut(Name)) {
    if let Some(kwarg) = args.kwarg {
        f(kwarg);
    }
    if let Some(vararg) = args.vararg {
        f(vararg);
    }
    for arg in &args.args {
        for_each_target(arg, f);
    }
}

fn for_each_target(target: &Expr, f: &mut impl FnMut(Name)) {
    match target {
        Expr::Name { id, .. } => f(*id),
        Expr::Attribute { .. } | Expr::Subscript { .. } => {}
        Expr::Tuple { elts, .. } | Expr::List { elts, .. } => {
            for elt in elts {
                for_each_target(elt, f);
            }
        }
        _ => invalid_target(target),
    }
}

#[cold]
fn invalid_target(target: &Expr) -> ! {
    panic!("unexpected assignment target: {target:?}")
}
