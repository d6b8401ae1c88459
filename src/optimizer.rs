use crate::ast::Node;

// Single post-order pass, rewriting in place. A pure function whose operands
// all fold to constants becomes a constant; variables and closures are never
// folded.
pub(crate) fn optimize(ast: &mut Node) {
    let foldable = match ast {
        Node::Constant(_) | Node::Variable(_) => return,
        Node::Function { pure, args, .. } => {
            for arg in args.iter_mut() {
                optimize(arg);
            }
            *pure && args.iter().all(Node::is_constant)
        }
        Node::Closure { args, .. } => {
            for arg in args.iter_mut() {
                optimize(arg);
            }
            false
        }
    };
    if foldable {
        *ast = Node::Constant(ast.eval());
    }
}
