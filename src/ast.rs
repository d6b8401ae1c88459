use std::fmt;
use std::sync::Arc;

use crate::lexer::Callee;
use crate::rt_types::{Context, CtxFunc, Func, Var};

/// A node of a compiled expression tree.
///
/// Every function and closure node owns exactly `arity` children; the tree is
/// never shared or cyclic, so dropping the root releases everything once.
#[derive(Clone, Debug)]
pub enum Node {
    /// A literal or folded value.
    Constant(f64),
    /// Re-read through the [`Var`] cell on every evaluation.
    Variable(Var),
    /// A plain function applied to its operands. Operators compile to these too.
    Function { func: Func, pure: bool, args: Box<[Node]> },
    /// A context function applied to its operands.
    Closure { func: CtxFunc, ctx: Arc<Context>, args: Box<[Node]> },
}

impl Node {
    pub(crate) fn call(callee: Callee, args: Vec<Node>) -> Node {
        let args = args.into_boxed_slice();
        match callee {
            Callee::Function { func, pure } => Node::Function { func, pure, args },
            Callee::Closure { func, ctx } => Node::Closure { func, ctx, args },
        }
    }

    pub fn arity(&self) -> usize {
        self.args().len()
    }

    /// Operand children, empty for leaves.
    pub fn args(&self) -> &[Node] {
        match self {
            Node::Constant(_) | Node::Variable(_) => &[],
            Node::Function { args, .. } | Node::Closure { args, .. } => args,
        }
    }

    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Node::Constant(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Node::Constant(_))
    }

    /// True for functions flagged side-effect free. Closures never are.
    pub fn is_pure(&self) -> bool {
        matches!(self, Node::Function { pure: true, .. })
    }

    /// Diagnostic rendering of the subtree rooted here.
    pub fn dump(&self) -> Dump<'_> {
        Dump(self)
    }
}

/// Indented one-line-per-node rendering of a tree, used for debugging.
///
/// Constants print their value, variables print `bound` and the cell address,
/// functions and closures print `f<arity>` / `c<arity>` followed by the
/// addresses of their children.
pub struct Dump<'a>(&'a Node);

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn walk(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
            write!(f, "{:width$}", "", width = depth)?;
            match node {
                Node::Constant(v) => writeln!(f, "{v:.6}"),
                Node::Variable(var) => writeln!(f, "bound {:p}", var.addr()),
                Node::Function { args, .. } | Node::Closure { args, .. } => {
                    let tag = if matches!(node, Node::Closure { .. }) { 'c' } else { 'f' };
                    write!(f, "{tag}{}", args.len())?;
                    for child in args.iter() {
                        write!(f, " {:p}", child)?;
                    }
                    writeln!(f)?;
                    for child in args.iter() {
                        walk(f, child, depth + 1)?;
                    }
                    Ok(())
                }
            }
        }
        walk(f, self.0, 0)
    }
}
