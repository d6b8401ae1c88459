use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recalc::{Binding, Var, compile};

// Grammar shared by both evaluators: arithmetic, remainder, parentheses and unary minus.
const EXPRESSIONS: &[&str] = &[
    "1 + 2 * 3",
    "(1 + 2) * 3",
    "10 - 4 - 3",
    "100 / 10 / 5",
    "7 % 3 + 1",
    "a * b - a / b",
    "((a + b) * (a - b)) % 5",
    "-a + 2 * -b",
    "((a)) * ((b + 1))",
    "2.5 * a - 0.125",
];

#[test]
fn agrees_with_fasteval() {
    let a = Var::new(0.0);
    let b = Var::new(0.0);
    let bindings = [Binding::var("a", &a), Binding::var("b", &b)];

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut inputs = vec![(1.0, 2.0), (-3.5, 7.25), (12.0, 0.5)];
    for _ in 0..50 {
        inputs.push((rng.gen_range(-100.0..100.0), rng.gen_range(0.5..100.0)));
    }

    for (va, vb) in inputs {
        a.set(va);
        b.set(vb);
        let mut ns: BTreeMap<String, f64> = BTreeMap::new();
        ns.insert("a".to_string(), va);
        ns.insert("b".to_string(), vb);

        for src in EXPRESSIONS {
            let ours = compile(src, &bindings).unwrap().eval();
            let theirs = fasteval::ez_eval(src, &mut ns).unwrap();
            assert!((ours - theirs).abs() <= 1e-9 * theirs.abs().max(1.0), "{src} with a={va} b={vb}: {ours} vs {theirs}");
        }
    }
}
