use std::sync::Arc;

use log::{debug, trace};

use crate::alloc::Heap;
use crate::ast::{Dump, Node};
use crate::collect::{collect_vars, count_nodes, depth};
use crate::error::{BindError, CompileError};
use crate::optimizer::optimize;
use crate::parser::Parser;
use crate::pool::{NodeId, Pool};
use crate::registry::{Native, find_native};
use crate::resolver::{Binding, BindingKind, Bindings};
use crate::rt_types::{Context, CtxFunc, Func, Var};

/// Grouping of chained `^`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowAssoc {
    /// `a^b^c` is `(a^b)^c`.
    #[default]
    Left,
    /// `a^b^c` is `a^(b^c)`.
    Right,
}

/// What the builtin `log` means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogBase {
    #[default]
    Ten,
    Natural,
}

/// Compile-time knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub pow_assoc: PowAssoc,
    pub log_base: LogBase,
    /// Fold pure subtrees over constants after parsing.
    pub fold_constants: bool,
    /// Maximum nesting of parentheses and call arguments.
    pub max_depth: usize,
    /// Maximum nodes a single compile may build.
    pub max_nodes: usize,
    /// Maximum height of the compiled tree. Evaluation, folding, dumping and
    /// dropping all recurse once per level, so this is what bounds stack use.
    pub max_height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pow_assoc: PowAssoc::Left,
            log_base: LogBase::Ten,
            fold_constants: true,
            max_depth: 64,
            max_nodes: 4096,
            max_height: 1024,
        }
    }
}

/// A compiled expression. Dropping it releases the whole tree.
#[derive(Clone, Debug)]
pub struct Expr {
    root: Node,
}

impl Expr {
    /// Evaluates against the current contents of the bound variables.
    pub fn eval(&self) -> f64 {
        self.root.eval()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn node_count(&self) -> usize {
        count_nodes(&self.root)
    }

    pub fn depth(&self) -> usize {
        depth(&self.root)
    }

    /// Variable cells the expression still reads after folding.
    pub fn vars(&self) -> Vec<Var> {
        collect_vars(&self.root)
    }

    /// Tree structure for diagnostics.
    pub fn dump(&self) -> Dump<'_> {
        self.root.dump()
    }

    /// Writes [`Expr::dump`] to stdout.
    pub fn print(&self) {
        print!("{}", self.dump());
    }
}

/// Parses and optimizes `expr` with the default [`Config`].
///
/// `bindings` are searched front to back before the builtin catalogue.
pub fn compile(expr: &str, bindings: &[Binding]) -> Result<Expr, CompileError> {
    compile_with(expr, bindings, &Config::default())
}

pub fn compile_with(expr: &str, bindings: &[Binding], config: &Config) -> Result<Expr, CompileError> {
    let (mut root, parsed) = Parser::new(expr, bindings, config, Heap)?.parse()?;
    if config.fold_constants {
        optimize(&mut root);
    }
    let expr_out = Expr { root };
    debug!(
        "compiled '{}' into {} nodes ({} before folding)",
        expr,
        expr_out.node_count(),
        parsed
    );
    trace!("tree for '{}'\n{}", expr, expr_out.dump());
    Ok(expr_out)
}

/// Compiles, evaluates and drops `expr` in one go. Only builtins are visible.
pub fn interp(expr: &str) -> Result<f64, CompileError> {
    compile(expr, &[]).map(|e| e.eval())
}

/// Owns a [`Config`] and a validated binding table, and compiles against both.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: Config,
    bindings: Bindings,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config, bindings: Bindings::new() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn register(&mut self, binding: Binding) -> Result<(), BindError> {
        debug!("registering '{}' ({:?})", binding.name, binding.kind);
        self.bindings.insert(binding)
    }

    pub fn register_var(&mut self, name: &str, var: &Var) -> Result<(), BindError> {
        self.register(Binding::var(name, var))
    }

    pub fn register_function(&mut self, name: &str, func: Func) -> Result<(), BindError> {
        self.register(Binding::function(name, func))
    }

    pub fn register_pure_function(&mut self, name: &str, func: Func) -> Result<(), BindError> {
        self.register(Binding::pure_function(name, func))
    }

    pub fn register_closure<T>(&mut self, name: &str, func: CtxFunc, ctx: T) -> Result<(), BindError>
    where
        T: Send + Sync + 'static,
    {
        self.register(Binding::closure(name, func, ctx))
    }

    /// Registers `#[function]`s by name. Context functions are rejected here;
    /// use [`Engine::register_native_closure`] for those.
    ///
    /// Either every name is registered or none is.
    pub fn register_natives(&mut self, names: &[&str]) -> Result<(), BindError> {
        let mut staged = Vec::with_capacity(names.len());
        for name in names {
            let meta = find_native(name).ok_or_else(|| BindError::UnknownFunction(name.to_string()))?;
            match meta.native {
                Native::Function { func, pure } => staged.push(Binding {
                    name: meta.name.to_string(),
                    kind: BindingKind::Function { func, pure },
                }),
                Native::Closure(_) => return Err(BindError::NeedsContext(name.to_string())),
            }
        }
        let mut bindings = self.bindings.clone();
        for binding in staged {
            debug!("registering '{}' ({:?})", binding.name, binding.kind);
            bindings.insert(binding)?;
        }
        self.bindings = bindings;
        Ok(())
    }

    /// Registers a `#[function]` that takes a context parameter, together with its context.
    pub fn register_native_closure<T>(&mut self, name: &str, ctx: T) -> Result<(), BindError>
    where
        T: Send + Sync + 'static,
    {
        let meta = find_native(name).ok_or_else(|| BindError::UnknownFunction(name.to_string()))?;
        match meta.native {
            Native::Closure(func) => {
                let ctx: Arc<Context> = Arc::new(ctx);
                self.register(Binding::closure_shared(meta.name, func, ctx))
            }
            Native::Function { .. } => Err(BindError::ContextNotAccepted(name.to_string())),
        }
    }

    pub fn unregister(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    pub fn compile(&self, expr: &str) -> Result<Expr, CompileError> {
        compile_with(expr, self.bindings.as_slice(), &self.config)
    }

    /// Compiles into a bounded [`Pool`] instead of the heap.
    pub fn compile_in(&self, pool: &mut Pool, expr: &str) -> Result<NodeId, CompileError> {
        let (id, parsed) = pool.compile(expr, self.bindings.as_slice(), &self.config)?;
        debug!(
            "compiled '{}' into pool ({} nodes parsed, {} of {} slots used)",
            expr,
            parsed,
            pool.len(),
            pool.capacity()
        );
        Ok(id)
    }

    pub fn interp(&self, expr: &str) -> Result<f64, CompileError> {
        self.compile(expr).map(|e| e.eval())
    }
}
