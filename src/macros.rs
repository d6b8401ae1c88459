/// Registers `#[function]`s with an [`Engine`](crate::Engine) by identifier.
///
/// ```
/// use recalc::{Engine, function, register_functions};
///
/// #[function(pure)]
/// fn hypot(a: f64, b: f64) -> f64 {
///     (a * a + b * b).sqrt()
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut eng = Engine::new();
/// register_functions!(eng, hypot)?;
/// assert_eq!(eng.interp("hypot(3, 4)")?, 5.0);
/// # Ok(()) }
/// ```
#[macro_export]
macro_rules! register_functions {
    ($engine:expr, $($name:ident),+ $(,)?) => {
        $engine.register_natives(&[$(stringify!($name)),+])
    };
}
