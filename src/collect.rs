use crate::ast::Node;
use crate::rt_types::Var;

/// Number of nodes in the tree rooted at `ast`.
pub(crate) fn count_nodes(ast: &Node) -> usize {
    let mut n = 1;
    for arg in ast.args() {
        n += count_nodes(arg);
    }
    n
}

/// Longest root-to-leaf path, counting nodes.
pub(crate) fn depth(ast: &Node) -> usize {
    let mut deepest = 0;
    for arg in ast.args() {
        deepest = deepest.max(depth(arg));
    }
    1 + deepest
}

/// Distinct variable cells read by the tree, in left-to-right first-appearance order.
pub(crate) fn collect_vars(ast: &Node) -> Vec<Var> {
    fn walk(node: &Node, out: &mut Vec<Var>) {
        match node {
            Node::Constant(_) => {}
            Node::Variable(var) => {
                if !out.iter().any(|seen| seen.same_cell(var)) {
                    out.push(var.clone());
                }
            }
            Node::Function { args, .. } | Node::Closure { args, .. } => {
                for a in args.iter() {
                    walk(a, out);
                }
            }
        }
    }
    let mut out = Vec::new();
    walk(ast, &mut out);
    out
}
