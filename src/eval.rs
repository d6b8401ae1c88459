use crate::ast::Node;
use crate::rt_types::MAX_ARITY;

impl Node {
    /// Computes the value of this subtree with the current variable contents.
    pub fn eval(&self) -> f64 {
        match self {
            Node::Constant(v) => *v,
            Node::Variable(var) => var.get(),
            Node::Function { func, args, .. } => apply(args, Node::eval, |v| func.call(v)),
            Node::Closure { func, ctx, args } => apply(args, Node::eval, |v| func.call(&**ctx, v)),
        }
    }
}

/// Evaluates `operands` left to right into a stack buffer and hands the values
/// to `f`. More than [`MAX_ARITY`] operands yields NaN.
#[inline]
pub(crate) fn apply<T>(operands: &[T], eval: impl Fn(&T) -> f64, f: impl FnOnce(&[f64]) -> f64) -> f64 {
    if operands.len() > MAX_ARITY {
        return f64::NAN;
    }
    let mut buf = [0.0; MAX_ARITY];
    for (slot, operand) in buf.iter_mut().zip(operands) {
        *slot = eval(operand);
    }
    f(&buf[..operands.len()])
}
