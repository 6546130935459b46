//! Syntax nodes stored in control-flow graph blocks.
//!
//! By the time a function reaches the analyses its body has already been
//! lowered into basic blocks, so statements here are flat: structured
//! control flow is gone and only `Branch`/`Jump`/`Return` remain. Nested
//! function and class bodies are kept as opaque statement lists; they are
//! analyzed as separate functions.
//!
//! Only the shapes the dataflow analyses inspect are modelled. Expression
//! kinds the analyses treat uniformly (calls, operators, comparisons) carry
//! just enough structure to be walked for reads.

use crate::{BlockId, Name};

/// How a name reference is used at the point it appears.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprContext {
    /// The reference reads the binding.
    Load,
    /// The reference (re)binds the name.
    Store,
    /// The reference unbinds the name (`del x`).
    Del,
    /// The reference is a formal parameter in an [`Arguments`] list.
    Param,
}

/// Binary operator. The analyses never look inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// An expression node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A name reference: `x`.
    Name { id: Name, ctx: ExprContext },
    /// Attribute access: `value.attr`.
    Attribute {
        value: Box<Expr>,
        attr: Name,
        ctx: ExprContext,
    },
    /// Subscript: `value[slice]`.
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
        ctx: ExprContext,
    },
    /// Tuple display or tuple-unpacking target: `(a, b)`.
    Tuple { elts: Vec<Expr>, ctx: ExprContext },
    /// List display or list-unpacking target: `[a, b]`.
    List { elts: Vec<Expr>, ctx: ExprContext },
    /// Call: `func(args...)`.
    Call { func: Box<Expr>, args: Vec<Expr> },
    /// Binary operation: `left op right`.
    BinOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Chained comparison: `left op0 c0 op1 c1 ...`.
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    /// Integer literal.
    Num(i64),
    /// String literal.
    Str(Name),
}

impl Expr {
    /// A name reference read at this point.
    pub fn load(id: Name) -> Self {
        Expr::Name {
            id,
            ctx: ExprContext::Load,
        }
    }

    /// A name reference bound at this point.
    pub fn store(id: Name) -> Self {
        Expr::Name {
            id,
            ctx: ExprContext::Store,
        }
    }

    /// A formal parameter name.
    pub fn param(id: Name) -> Self {
        Expr::Name {
            id,
            ctx: ExprContext::Param,
        }
    }

    /// `func(args...)`.
    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
        }
    }

    /// `left op right`.
    pub fn binop(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// `value.attr` in the given context.
    pub fn attribute(value: Expr, attr: Name, ctx: ExprContext) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr,
            ctx,
        }
    }

    /// `value[slice]` in the given context.
    pub fn subscript(value: Expr, slice: Expr, ctx: ExprContext) -> Self {
        Expr::Subscript {
            value: Box::new(value),
            slice: Box::new(slice),
            ctx,
        }
    }
}

/// One entry of an import statement: `name [as asname]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Alias {
    pub name: Name,
    pub asname: Option<Name>,
}

impl Alias {
    /// The local name the import binds.
    pub fn bound_name(&self) -> Name {
        self.asname.unwrap_or(self.name)
    }
}

/// A function's formal parameter list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Arguments {
    /// Positional parameters, as binding targets (names or nested tuples).
    pub args: Vec<Expr>,
    /// `*vararg`
    pub vararg: Option<Name>,
    /// `**kwarg`
    pub kwarg: Option<Name>,
    /// Default values, evaluated in the enclosing scope.
    pub defaults: Vec<Expr>,
}

/// A statement inside a basic block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stmt {
    /// `t0 = t1 = ... = value`
    Assign { targets: Vec<Expr>, value: Expr },
    /// `class name(bases): body`
    ClassDef {
        name: Name,
        bases: Vec<Expr>,
        body: Vec<Stmt>,
    },
    /// `def name(args): body`, with its decorators.
    FunctionDef {
        name: Name,
        args: Arguments,
        decorators: Vec<Expr>,
        body: Vec<Stmt>,
    },
    /// `import a, b as c`
    Import { names: Vec<Alias> },
    /// Conditional block terminator.
    Branch {
        test: Expr,
        iftrue: BlockId,
        iffalse: BlockId,
    },
    /// Unconditional block terminator.
    Jump { target: BlockId },
    /// Expression evaluated for its side effects.
    Expr(Expr),
    Pass,
    Return(Option<Expr>),
    /// `print >>dest, values...`
    Print {
        dest: Option<Expr>,
        values: Vec<Expr>,
        nl: bool,
    },
    /// `global names...`
    Global { names: Vec<Name> },
}

impl Stmt {
    /// `target = value` with a single plain-name target.
    pub fn assign(target: Name, value: Expr) -> Self {
        Stmt::Assign {
            targets: vec![Expr::store(target)],
            value,
        }
    }

    /// Block ids this statement transfers control to, if it is a terminator.
    pub fn jump_targets(&self) -> impl Iterator<Item = BlockId> {
        let (first, second) = match *self {
            Stmt::Branch {
                iftrue, iffalse, ..
            } => (Some(iftrue), Some(iffalse)),
            Stmt::Jump { target } => (Some(target), None),
            _ => (None, None),
        };
        first.into_iter().chain(second)
    }
}
