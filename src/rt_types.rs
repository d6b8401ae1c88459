use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Largest number of operands a function or closure node can take.
pub const MAX_ARITY: usize = 7;

/// Opaque user context handed to closures as their first argument.
///
/// Closures receive it as `&Context` and downcast to their concrete type:
/// ```
/// use recalc::Context;
/// struct Bias(f64);
/// fn add_bias(ctx: &Context, x: f64) -> f64 {
///     ctx.downcast_ref::<Bias>().map_or(f64::NAN, |b| x + b.0)
/// }
/// # let _ = add_bias;
/// ```
pub type Context = dyn Any + Send + Sync;

pub type Fn0 = fn() -> f64;
pub type Fn1 = fn(f64) -> f64;
pub type Fn2 = fn(f64, f64) -> f64;
pub type Fn3 = fn(f64, f64, f64) -> f64;
pub type Fn4 = fn(f64, f64, f64, f64) -> f64;
pub type Fn5 = fn(f64, f64, f64, f64, f64) -> f64;
pub type Fn6 = fn(f64, f64, f64, f64, f64, f64) -> f64;
pub type Fn7 = fn(f64, f64, f64, f64, f64, f64, f64) -> f64;

pub type Cl0 = fn(&Context) -> f64;
pub type Cl1 = fn(&Context, f64) -> f64;
pub type Cl2 = fn(&Context, f64, f64) -> f64;
pub type Cl3 = fn(&Context, f64, f64, f64) -> f64;
pub type Cl4 = fn(&Context, f64, f64, f64, f64) -> f64;
pub type Cl5 = fn(&Context, f64, f64, f64, f64, f64) -> f64;
pub type Cl6 = fn(&Context, f64, f64, f64, f64, f64, f64) -> f64;
pub type Cl7 = fn(&Context, f64, f64, f64, f64, f64, f64, f64) -> f64;

/// A plain function over `f64`, tagged by arity.
#[derive(Clone, Copy)]
pub enum Func {
    F0(Fn0),
    F1(Fn1),
    F2(Fn2),
    F3(Fn3),
    F4(Fn4),
    F5(Fn5),
    F6(Fn6),
    F7(Fn7),
}

impl Func {
    pub fn arity(&self) -> usize {
        match self {
            Func::F0(_) => 0,
            Func::F1(_) => 1,
            Func::F2(_) => 2,
            Func::F3(_) => 3,
            Func::F4(_) => 4,
            Func::F5(_) => 5,
            Func::F6(_) => 6,
            Func::F7(_) => 7,
        }
    }

    /// Calls the function. An argument count that does not match the arity yields NaN.
    pub fn call(&self, args: &[f64]) -> f64 {
        match (self, args) {
            (Func::F0(f), []) => f(),
            (Func::F1(f), &[a]) => f(a),
            (Func::F2(f), &[a, b]) => f(a, b),
            (Func::F3(f), &[a, b, c]) => f(a, b, c),
            (Func::F4(f), &[a, b, c, d]) => f(a, b, c, d),
            (Func::F5(f), &[a, b, c, d, e]) => f(a, b, c, d, e),
            (Func::F6(f), &[a, b, c, d, e, g]) => f(a, b, c, d, e, g),
            (Func::F7(f), &[a, b, c, d, e, g, h]) => f(a, b, c, d, e, g, h),
            _ => f64::NAN,
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func/{}", self.arity())
    }
}

/// A function that takes an opaque [`Context`] ahead of its `f64` operands.
#[derive(Clone, Copy)]
pub enum CtxFunc {
    C0(Cl0),
    C1(Cl1),
    C2(Cl2),
    C3(Cl3),
    C4(Cl4),
    C5(Cl5),
    C6(Cl6),
    C7(Cl7),
}

impl CtxFunc {
    pub fn arity(&self) -> usize {
        match self {
            CtxFunc::C0(_) => 0,
            CtxFunc::C1(_) => 1,
            CtxFunc::C2(_) => 2,
            CtxFunc::C3(_) => 3,
            CtxFunc::C4(_) => 4,
            CtxFunc::C5(_) => 5,
            CtxFunc::C6(_) => 6,
            CtxFunc::C7(_) => 7,
        }
    }

    pub fn call(&self, ctx: &Context, args: &[f64]) -> f64 {
        match (self, args) {
            (CtxFunc::C0(f), []) => f(ctx),
            (CtxFunc::C1(f), &[a]) => f(ctx, a),
            (CtxFunc::C2(f), &[a, b]) => f(ctx, a, b),
            (CtxFunc::C3(f), &[a, b, c]) => f(ctx, a, b, c),
            (CtxFunc::C4(f), &[a, b, c, d]) => f(ctx, a, b, c, d),
            (CtxFunc::C5(f), &[a, b, c, d, e]) => f(ctx, a, b, c, d, e),
            (CtxFunc::C6(f), &[a, b, c, d, e, g]) => f(ctx, a, b, c, d, e, g),
            (CtxFunc::C7(f), &[a, b, c, d, e, g, h]) => f(ctx, a, b, c, d, e, g, h),
            _ => f64::NAN,
        }
    }
}

impl fmt::Debug for CtxFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CtxFunc/{}", self.arity())
    }
}

/// A caller-owned `f64` that compiled expressions read through on every evaluation.
///
/// Clones share the same cell, so the host keeps one handle and binds another:
/// ```
/// use recalc::{compile, Binding, Var};
/// # fn main() -> Result<(), recalc::CompileError> {
/// let x = Var::new(3.0);
/// let expr = compile("x + 1", &[Binding::var("x", &x)])?;
/// assert_eq!(expr.eval(), 4.0);
/// x.set(10.0);
/// assert_eq!(expr.eval(), 11.0);
/// # Ok(()) }
/// ```
///
/// Reads and writes are individually atomic (relaxed). A write racing with an
/// evaluation is well defined but the evaluation may see either value; ordering
/// writes against evaluations is up to the caller.
#[derive(Clone, Default)]
pub struct Var(Arc<AtomicU64>);

impl Var {
    pub fn new(value: f64) -> Self {
        Var(Arc::new(AtomicU64::new(value.to_bits())))
    }

    #[inline]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Address of the shared cell, stable for the life of the variable.
    pub fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }

    /// True when both handles refer to the same cell.
    pub fn same_cell(&self, other: &Var) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({:p} = {})", self.addr(), self.get())
    }
}
