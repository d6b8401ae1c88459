use std::sync::atomic::{AtomicUsize, Ordering};

use recalc::{Binding, Config, Func, Node, Var, compile, compile_with};

#[test]
fn constant_expression_folds_to_one_node() {
    let folded = compile("2+3", &[]).unwrap();
    let literal = compile("5", &[]).unwrap();
    assert_eq!(folded.node_count(), 1);
    assert_eq!(literal.node_count(), 1);
    assert_eq!(folded.eval(), 5.0);
    assert_eq!(folded.root().as_constant(), Some(5.0));
}

#[test]
fn builtins_fold() {
    let expr = compile("sqrt(16) + pow(2, 3) * pi", &[]).unwrap();
    assert_eq!(expr.node_count(), 1);
    assert_eq!(expr.eval(), 4.0 + 8.0 * std::f64::consts::PI);
}

#[test]
fn variables_block_folding_only_where_they_appear() {
    let x = Var::new(1.0);
    let expr = compile("x + (2 * 3)", &[Binding::var("x", &x)]).unwrap();
    // add, variable, folded product
    assert_eq!(expr.node_count(), 3);
    let args = expr.root().args();
    assert!(matches!(args[0], Node::Variable(_)));
    assert_eq!(args[1].as_constant(), Some(6.0));
    x.set(4.0);
    assert_eq!(expr.eval(), 10.0);
}

static CALLS: AtomicUsize = AtomicUsize::new(0);

fn counted(x: f64) -> f64 {
    CALLS.fetch_add(1, Ordering::SeqCst);
    x * 2.0
}

#[test]
fn impure_functions_are_not_folded() {
    let bindings = [Binding::function("counted", Func::F1(counted))];
    let before = CALLS.load(Ordering::SeqCst);
    let expr = compile("counted(2 + 1)", &bindings).unwrap();
    assert_eq!(CALLS.load(Ordering::SeqCst), before);
    // its operand still folds
    assert_eq!(expr.node_count(), 2);
    assert!(!expr.root().is_pure());
    assert_eq!(expr.eval(), 6.0);
    assert_eq!(expr.eval(), 6.0);
    assert_eq!(CALLS.load(Ordering::SeqCst), before + 2);
}

fn halve(x: f64) -> f64 {
    x / 2.0
}

#[test]
fn pure_user_functions_fold() {
    let bindings = [Binding::pure_function("halve", Func::F1(halve))];
    let expr = compile("halve 10 + 1", &bindings).unwrap();
    assert_eq!(expr.node_count(), 1);
    assert_eq!(expr.eval(), 6.0);
}

#[test]
fn folding_can_be_disabled() {
    let config = Config { fold_constants: false, ..Config::default() };
    let expr = compile_with("2+3", &[], &config).unwrap();
    assert_eq!(expr.node_count(), 3);
    assert!(expr.root().is_pure());
    assert_eq!(expr.root().arity(), 2);
    assert_eq!(expr.eval(), 5.0);
}

#[test]
fn folding_preserves_nan_and_infinity() {
    let expr = compile("0/0 + 1", &[]).unwrap();
    assert_eq!(expr.node_count(), 1);
    assert!(expr.eval().is_nan());
    assert_eq!(compile("1/0", &[]).unwrap().eval(), f64::INFINITY);
}

#[test]
fn depth_reflects_tree_shape() {
    let x = Var::new(0.0);
    let b = [Binding::var("x", &x)];
    assert_eq!(compile("1", &[]).unwrap().depth(), 1);
    // ((x+1)+1)+1 is left-deep
    assert_eq!(compile("x+1+1+1", &b).unwrap().depth(), 4);
}
