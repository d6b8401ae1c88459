//! Compile an arithmetic formula once and evaluate it many times as its bound
//! variables change.
//!
//! ```
//! use recalc::{compile, Binding, Var};
//! # fn main() -> Result<(), recalc::CompileError> {
//! let x = Var::new(0.0);
//! let y = Var::new(0.0);
//! let expr = compile("sqrt(x^2 + y^2)", &[Binding::var("x", &x), Binding::var("y", &y)])?;
//! x.set(3.0);
//! y.set(4.0);
//! assert_eq!(expr.eval(), 5.0);
//! # Ok(()) }
//! ```

extern crate self as recalc;

mod alloc;
mod ast;
mod builtins;
mod collect;
mod engine;
mod error;
mod eval;
mod lexer;
mod macros;
mod optimizer;
mod parser;
mod pool;
mod registry;
mod resolver;
mod rt_types;

pub use ast::{Dump, Node};
pub use builtins::builtins;
pub use engine::{Config, Engine, Expr, LogBase, PowAssoc, compile, compile_with, interp};
pub use error::{BindError, CompileError};
pub use pool::{NodeId, Pool};
pub use registry::{FnMeta, Native, find_native, natives};
pub use resolver::{Binding, BindingKind, Bindings, is_valid_name};
pub use rt_types::{
    Cl0, Cl1, Cl2, Cl3, Cl4, Cl5, Cl6, Cl7, Context, CtxFunc, Fn0, Fn1, Fn2, Fn3, Fn4, Fn5, Fn6,
    Fn7, Func, MAX_ARITY, Var,
};

// Re-export inventory and the #[function] macro for user crates
pub use inventory;
pub use recalc_macros::function;
