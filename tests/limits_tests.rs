//! Limits are checked on spawned threads, which get the default 2 MiB stack
//! rather than the larger one of the test harness main thread.

use std::thread;

use recalc::{Binding, CompileError, Config, PowAssoc, Var, compile, compile_with};

fn chain(term: &str, op: &str, n: usize) -> String {
    vec![term; n].join(op)
}

fn on_thread<F: FnOnce() + Send + 'static>(f: F) {
    thread::spawn(f).join().unwrap();
}

#[test]
fn chain_at_default_height_compiles_and_evaluates() {
    on_thread(|| {
        let limit = Config::default().max_height;
        let x = Var::new(1.0);
        let expr = compile(&chain("x", "+", limit), &[Binding::var("x", &x)]).unwrap();
        assert_eq!(expr.depth(), limit);
        assert_eq!(expr.node_count(), 2 * limit - 1);
        assert_eq!(expr.eval(), limit as f64);
        assert_eq!(expr.dump().to_string().lines().count(), 2 * limit - 1);

        x.set(0.5);
        assert_eq!(expr.eval(), limit as f64 / 2.0);
        drop(expr);
    });
}

#[test]
fn constant_chain_at_default_height_folds() {
    on_thread(|| {
        let limit = Config::default().max_height;
        let expr = compile(&chain("1", "+", limit), &[]).unwrap();
        assert_eq!(expr.node_count(), 1);
        assert_eq!(expr.eval(), limit as f64);

        let config = Config { fold_constants: false, ..Config::default() };
        let expr = compile_with(&chain("1", "+", limit), &[], &config).unwrap();
        assert_eq!(expr.depth(), limit);
        assert_eq!(expr.eval(), limit as f64);
    });
}

#[test]
fn right_assoc_pow_chain_at_default_height() {
    on_thread(|| {
        let config = Config { pow_assoc: PowAssoc::Right, ..Config::default() };
        let limit = config.max_height;
        let x = Var::new(1.0);
        let expr = compile_with(&chain("x", "^", limit), &[Binding::var("x", &x)], &config).unwrap();
        assert_eq!(expr.depth(), limit);
        assert_eq!(expr.eval(), 1.0);
    });
}

#[test]
fn one_past_the_height_is_rejected() {
    on_thread(|| {
        let limit = Config::default().max_height;
        let x = Var::new(1.0);
        let err = compile(&chain("x", "+", limit + 1), &[Binding::var("x", &x)]).unwrap_err();
        match err {
            CompileError::TooDeep { limit: l, offset } => {
                assert_eq!(l, limit);
                assert!(offset > 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    });
}

#[test]
fn full_node_budget_compiles_and_evaluates() {
    on_thread(|| {
        let config = Config::default();
        assert_eq!(config.max_nodes, 4096);
        let x = Var::new(1.0);
        let bindings = [Binding::var("x", &x)];

        // four groups of 512 terms: 4 * 1023 nodes plus 3 joining them
        let group = format!("({})", chain("x", "+", 512));
        let src = chain(&group, "+", 4);
        let expr = compile(&src, &bindings).unwrap();
        assert_eq!(expr.node_count(), 4095);
        assert_eq!(expr.depth(), 515);
        assert_eq!(expr.eval(), 2048.0);

        let over = format!("{src}+x");
        assert_eq!(compile(&over, &bindings).unwrap_err(), CompileError::OutOfNodes { limit: 4096 });
    });
}

#[test]
fn height_limit_is_configurable() {
    let config = Config { max_height: 3, ..Config::default() };
    assert_eq!(compile_with("1+2+3", &[], &config).unwrap().eval(), 6.0);
    let err = compile_with("1+2+3+4", &[], &config).unwrap_err();
    assert!(matches!(err, CompileError::TooDeep { limit: 3, .. }));
    // same size, shallower shape
    assert_eq!(compile_with("(1+2)+(3+4)", &[], &config).unwrap().eval(), 10.0);
}
