use recalc::{Config, Engine, PowAssoc, compile_with, interp};

fn right_assoc() -> Config {
    Config { pow_assoc: PowAssoc::Right, ..Config::default() }
}

#[test]
fn pow_basic() {
    assert_eq!(interp("2 ^ 3").unwrap(), 8.0);
    assert_eq!(interp("pow(2, 3)").unwrap(), 8.0);
}

#[test]
fn pow_left_associative_by_default() {
    // (2^2)^3 = 64
    assert_eq!(interp("2^2^3").unwrap(), 64.0);
}

#[test]
fn pow_right_associative_when_configured() {
    // 2^(2^3) = 256
    let e = compile_with("2^2^3", &[], &right_assoc()).unwrap();
    assert_eq!(e.eval(), 256.0);

    let eng = Engine::with_config(right_assoc());
    assert_eq!(eng.interp("2 ^ 3 ^ 2").unwrap(), 512.0);
}

#[test]
fn leading_minus_applies_to_whole_chain() {
    assert_eq!(interp("-2^2").unwrap(), -4.0);
    assert_eq!(interp("(-2)^2").unwrap(), 4.0);
    assert_eq!(interp("--2^2").unwrap(), 4.0);

    let eng = Engine::with_config(right_assoc());
    assert_eq!(eng.interp("-2^2").unwrap(), -4.0);
    assert_eq!(eng.interp("-2^2^3").unwrap(), -256.0);
}

#[test]
fn sign_on_exponent_stays_local() {
    assert_eq!(interp("2^-1").unwrap(), 0.5);
    assert_eq!(interp("2^-1^2").unwrap(), 0.25);
    let eng = Engine::with_config(right_assoc());
    // 2^((-1)^2)
    assert_eq!(eng.interp("2^-1^2").unwrap(), 2.0);
}

#[test]
fn pow_precedence_with_mul() {
    assert_eq!(interp("2^3*2").unwrap(), 16.0);
    assert_eq!(interp("2*2^3").unwrap(), 16.0);
    assert_eq!(interp("-2^2*3").unwrap(), -12.0);
}

#[test]
fn pow_fractional_exponent() {
    assert_eq!(interp("16 ^ 0.5").unwrap(), 4.0);
    assert!(interp("(-8) ^ 0.5").unwrap().is_nan());
}
