use std::ops::Range;
use std::sync::Arc;

use crate::alloc::NodeAlloc;
use crate::engine::Config;
use crate::error::CompileError;
use crate::eval::apply;
use crate::lexer::Callee;
use crate::parser::Parser;
use crate::resolver::Binding;
use crate::rt_types::{Context, CtxFunc, Func, MAX_ARITY, Var};

/// Handle to a tree stored in a [`Pool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

enum Slot {
    Constant(f64),
    Variable(Var),
    Function { func: Func, first: u32, len: u8 },
    Closure { func: CtxFunc, ctx: Arc<Context>, first: u32, len: u8 },
}

/// Fixed-capacity node storage for hosts that want a hard memory bound.
///
/// Slots are reserved up front and never reallocated. The parser allocates
/// straight into the pool, so an expression that does not fit stops compiling
/// at the first node that finds the pool full. Trees are stored all-or-nothing:
/// on any error the pool is rolled back to where it was.
///
/// ```
/// use recalc::{Engine, Pool};
/// # fn main() -> Result<(), recalc::CompileError> {
/// let engine = Engine::new();
/// let mut pool = Pool::with_capacity(16);
/// let id = engine.compile_in(&mut pool, "sqrt(16) + 1")?;
/// assert_eq!(pool.eval(id), 5.0);
/// # Ok(()) }
/// ```
pub struct Pool {
    slots: Vec<Slot>,
    edges: Vec<NodeId>,
    capacity: usize,
}

impl Pool {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(u32::MAX as usize);
        Self {
            slots: Vec::with_capacity(capacity),
            // every stored node is the child of at most one parent
            edges: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.slots.len()
    }

    /// Releases every stored tree. Previously returned ids become dangling and evaluate to NaN
    /// until their slots are reused.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.edges.clear();
    }

    /// Parses `expr` directly into the pool.
    pub(crate) fn compile(
        &mut self,
        expr: &str,
        bindings: &[Binding],
        config: &Config,
    ) -> Result<(NodeId, usize), CompileError> {
        let (slots, edges) = (self.slots.len(), self.edges.len());
        let builder = Builder { pool: self, fold: config.fold_constants };
        let built = Parser::new(expr, bindings, config, builder).and_then(|p| p.parse());
        if built.is_err() {
            self.slots.truncate(slots);
            self.edges.truncate(edges);
        }
        built
    }

    fn push(&mut self, slot: Slot) -> Result<NodeId, CompileError> {
        if self.slots.len() >= self.capacity {
            return Err(CompileError::OutOfNodes { limit: self.capacity });
        }
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(slot);
        Ok(id)
    }

    fn children(&self, first: u32, len: u8) -> Option<&[NodeId]> {
        let range: Range<usize> = first as usize..first as usize + len as usize;
        self.edges.get(range)
    }

    /// Evaluates the tree rooted at `id`. Ids that do not name a slot yield NaN.
    pub fn eval(&self, id: NodeId) -> f64 {
        let eval = |child: &NodeId| self.eval(*child);
        match self.slots.get(id.index()) {
            None => f64::NAN,
            Some(Slot::Constant(v)) => *v,
            Some(Slot::Variable(var)) => var.get(),
            Some(Slot::Function { func, first, len }) => match self.children(*first, *len) {
                Some(ids) => apply(ids, eval, |v| func.call(v)),
                None => f64::NAN,
            },
            Some(Slot::Closure { func, ctx, first, len }) => match self.children(*first, *len) {
                Some(ids) => apply(ids, eval, |v| func.call(&**ctx, v)),
                None => f64::NAN,
            },
        }
    }
}

/// Allocates parser output into a [`Pool`].
///
/// Children land before their parent and a parent's child ids are contiguous
/// in `edges`. With folding on, a pure call over constants that sit at the top
/// of the pool is evaluated at once and its operand slots are reclaimed.
struct Builder<'p> {
    pool: &'p mut Pool,
    fold: bool,
}

impl Builder<'_> {
    fn folded(&self, callee: &Callee, args: &[NodeId]) -> Option<(usize, f64)> {
        let Callee::Function { func, pure: true } = callee else {
            return None;
        };
        if args.len() > MAX_ARITY {
            return None;
        }
        let base = self.pool.slots.len().checked_sub(args.len())?;
        let mut values = [0.0; MAX_ARITY];
        for (i, (id, value)) in args.iter().zip(values.iter_mut()).enumerate() {
            if id.index() != base + i {
                return None;
            }
            match self.pool.slots[id.index()] {
                Slot::Constant(v) => *value = v,
                _ => return None,
            }
        }
        Some((base, func.call(&values[..args.len()])))
    }
}

impl NodeAlloc for Builder<'_> {
    type Ref = NodeId;

    fn constant(&mut self, value: f64) -> Result<NodeId, CompileError> {
        self.pool.push(Slot::Constant(value))
    }

    fn variable(&mut self, var: Var) -> Result<NodeId, CompileError> {
        self.pool.push(Slot::Variable(var))
    }

    fn call(&mut self, callee: Callee, args: Vec<NodeId>) -> Result<NodeId, CompileError> {
        if self.fold {
            if let Some((base, value)) = self.folded(&callee, &args) {
                self.pool.slots.truncate(base);
                return self.pool.push(Slot::Constant(value));
            }
        }
        if self.pool.remaining() == 0 {
            return Err(CompileError::OutOfNodes { limit: self.pool.capacity });
        }
        let first = self.pool.edges.len() as u32;
        let len = args.len() as u8;
        self.pool.edges.extend(args);
        let slot = match callee {
            Callee::Function { func, .. } => Slot::Function { func, first, len },
            Callee::Closure { func, ctx } => Slot::Closure { func, ctx, first, len },
        };
        self.pool.push(slot)
    }
}
