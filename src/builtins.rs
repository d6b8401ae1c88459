use std::f64::consts;

use crate::engine::LogBase;
use crate::rt_types::Func;

pub(crate) struct Builtin {
    pub(crate) name: &'static str,
    pub(crate) func: Func,
}

// Sorted by name; `lookup` relies on it.
static BUILTINS: [Builtin; 24] = [
    Builtin { name: "abs", func: Func::F1(f64::abs) },
    Builtin { name: "acos", func: Func::F1(f64::acos) },
    Builtin { name: "asin", func: Func::F1(f64::asin) },
    Builtin { name: "atan", func: Func::F1(f64::atan) },
    Builtin { name: "atan2", func: Func::F2(f64::atan2) },
    Builtin { name: "ceil", func: Func::F1(f64::ceil) },
    Builtin { name: "cos", func: Func::F1(f64::cos) },
    Builtin { name: "cosh", func: Func::F1(f64::cosh) },
    Builtin { name: "e", func: Func::F0(e) },
    Builtin { name: "exp", func: Func::F1(f64::exp) },
    Builtin { name: "fac", func: Func::F1(fac) },
    Builtin { name: "floor", func: Func::F1(f64::floor) },
    Builtin { name: "ln", func: Func::F1(f64::ln) },
    Builtin { name: "log", func: Func::F1(f64::log10) },
    Builtin { name: "log10", func: Func::F1(f64::log10) },
    Builtin { name: "ncr", func: Func::F2(ncr) },
    Builtin { name: "npr", func: Func::F2(npr) },
    Builtin { name: "pi", func: Func::F0(pi) },
    Builtin { name: "pow", func: Func::F2(f64::powf) },
    Builtin { name: "sin", func: Func::F1(f64::sin) },
    Builtin { name: "sinh", func: Func::F1(f64::sinh) },
    Builtin { name: "sqrt", func: Func::F1(f64::sqrt) },
    Builtin { name: "tan", func: Func::F1(f64::tan) },
    Builtin { name: "tanh", func: Func::F1(f64::tanh) },
];

/// Binary search over the catalogue. `log` follows the configured base.
pub(crate) fn lookup(name: &str, log_base: LogBase) -> Option<Func> {
    let idx = BUILTINS.binary_search_by(|b| b.name.cmp(name)).ok()?;
    let builtin = &BUILTINS[idx];
    match (builtin.name, log_base) {
        ("log", LogBase::Natural) => Some(Func::F1(f64::ln)),
        _ => Some(builtin.func),
    }
}

/// Names and arities of the builtin catalogue, in lookup order.
pub fn builtins() -> impl Iterator<Item = (&'static str, usize)> {
    BUILTINS.iter().map(|b| (b.name, b.func.arity()))
}

fn e() -> f64 {
    consts::E
}

fn pi() -> f64 {
    consts::PI
}

/// Factorial of the integer part. Negative input is NaN; overflow saturates to +inf.
pub(crate) fn fac(a: f64) -> f64 {
    if a.is_nan() || a < 0.0 {
        return f64::NAN;
    }
    if a > u32::MAX as f64 {
        return f64::INFINITY;
    }
    let n = a as u64;
    let mut result: u64 = 1;
    for i in 1..=n {
        match result.checked_mul(i) {
            Some(r) => result = r,
            None => return f64::INFINITY,
        }
    }
    result as f64
}

/// Combinations of `r` out of `n`, on the integer parts.
pub(crate) fn ncr(n: f64, r: f64) -> f64 {
    if n.is_nan() || r.is_nan() || n < 0.0 || r < 0.0 || n < r {
        return f64::NAN;
    }
    if n > u32::MAX as f64 || r > u32::MAX as f64 {
        return f64::INFINITY;
    }
    let un = n as u64;
    let mut ur = r as u64;
    if ur > un / 2 {
        ur = un - ur;
    }
    let mut result: u64 = 1;
    for i in 1..=ur {
        match result.checked_mul(un - ur + i) {
            Some(r) => result = r / i,
            None => return f64::INFINITY,
        }
    }
    result as f64
}

pub(crate) fn npr(n: f64, r: f64) -> f64 {
    ncr(n, r) * fac(r)
}
