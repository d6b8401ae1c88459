use std::f64::consts::{E, PI};

use recalc::{Binding, Config, Engine, Func, LogBase, builtins, compile, compile_with, interp};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

#[test]
fn catalogue_is_sorted_and_complete() {
    let names: Vec<&str> = builtins().map(|(name, _)| name).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 24);
    for expected in ["abs", "atan2", "e", "fac", "log10", "ncr", "npr", "pi", "pow", "tanh"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    let arity = |n: &str| builtins().find(|(name, _)| *name == n).map(|(_, a)| a);
    assert_eq!(arity("pi"), Some(0));
    assert_eq!(arity("sin"), Some(1));
    assert_eq!(arity("atan2"), Some(2));
}

#[test]
fn constants_with_or_without_parens() {
    assert_eq!(interp("pi").unwrap(), PI);
    assert_eq!(interp("pi()").unwrap(), PI);
    assert_eq!(interp("e").unwrap(), E);
    assert_eq!(interp("e()").unwrap(), E);
    assert_eq!(interp("2 * pi").unwrap(), 2.0 * PI);
}

#[test]
fn trigonometry() {
    assert!(approx(interp("sin(pi/2)").unwrap(), 1.0));
    assert!(approx(interp("cos 0").unwrap(), 1.0));
    assert!(approx(interp("tan(pi/4)").unwrap(), 1.0));
    assert!(approx(interp("asin 1").unwrap(), PI / 2.0));
    assert!(approx(interp("acos 1").unwrap(), 0.0));
    assert!(approx(interp("atan 1").unwrap(), PI / 4.0));
    assert!(approx(interp("atan2(1, 1)").unwrap(), PI / 4.0));
    assert!(approx(interp("sinh 0").unwrap(), 0.0));
    assert!(approx(interp("cosh 0").unwrap(), 1.0));
    assert!(approx(interp("tanh 0").unwrap(), 0.0));
}

#[test]
fn rounding_and_roots() {
    assert_eq!(interp("abs(-3.5)").unwrap(), 3.5);
    assert_eq!(interp("ceil 1.2").unwrap(), 2.0);
    assert_eq!(interp("floor(-1.2)").unwrap(), -2.0);
    assert_eq!(interp("sqrt 81").unwrap(), 9.0);
    assert!(interp("sqrt(-1)").unwrap().is_nan());
}

#[test]
fn logarithms() {
    assert!(approx(interp("exp 1").unwrap(), E));
    assert!(approx(interp("ln e").unwrap(), 1.0));
    assert!(approx(interp("log 1000").unwrap(), 3.0));
    assert!(approx(interp("log10 100").unwrap(), 2.0));
    assert_eq!(interp("ln 0").unwrap(), f64::NEG_INFINITY);
}

#[test]
fn log_can_be_natural() {
    let config = Config { log_base: LogBase::Natural, ..Config::default() };
    let expr = compile_with("log(e)", &[], &config).unwrap();
    assert!(approx(expr.eval(), 1.0));
    // log10 keeps its meaning
    let expr = compile_with("log10(1000)", &[], &config).unwrap();
    assert!(approx(expr.eval(), 3.0));
}

#[test]
fn factorial() {
    assert_eq!(interp("fac 0").unwrap(), 1.0);
    assert_eq!(interp("fac 5").unwrap(), 120.0);
    assert_eq!(interp("fac 5.9").unwrap(), 120.0);
    assert_eq!(interp("fac 20").unwrap(), 2_432_902_008_176_640_000.0);
    assert_eq!(interp("fac 1000").unwrap(), f64::INFINITY);
    assert_eq!(interp("fac 1e300").unwrap(), f64::INFINITY);
    assert!(interp("fac(-1)").unwrap().is_nan());
}

#[test]
fn combinations_and_permutations() {
    assert_eq!(interp("ncr(5, 2)").unwrap(), 10.0);
    assert_eq!(interp("ncr(6, 0)").unwrap(), 1.0);
    assert_eq!(interp("ncr(6, 6)").unwrap(), 1.0);
    assert_eq!(interp("npr(5, 2)").unwrap(), 20.0);
    assert_eq!(interp("ncr(60, 30)").unwrap(), 118_264_581_564_861_424.0);
    assert!(interp("ncr(2, 5)").unwrap().is_nan());
    assert!(interp("ncr(-1, 0)").unwrap().is_nan());
    assert!(interp("npr(1, -1)").unwrap().is_nan());
}

fn always_seven(_x: f64) -> f64 {
    7.0
}

#[test]
fn bindings_shadow_builtins() {
    let bindings = [Binding::pure_function("sin", Func::F1(always_seven))];
    let expr = compile("sin 0", &bindings).unwrap();
    assert_eq!(expr.eval(), 7.0);

    let mut eng = Engine::new();
    eng.register_function("cos", Func::F1(always_seven)).unwrap();
    assert_eq!(eng.interp("cos(pi)").unwrap(), 7.0);
    eng.unregister("cos");
    assert_eq!(eng.interp("cos(pi)").unwrap(), -1.0);
}
