use crate::ast::Node;
use crate::error::CompileError;
use crate::lexer::Callee;
use crate::rt_types::Var;

/// Where the parser puts the nodes it builds.
///
/// Children are always handed over before their parent, so implementations see
/// the tree in post-order. Any call may refuse with [`CompileError::OutOfNodes`].
pub(crate) trait NodeAlloc {
    type Ref;

    fn constant(&mut self, value: f64) -> Result<Self::Ref, CompileError>;
    fn variable(&mut self, var: Var) -> Result<Self::Ref, CompileError>;
    fn call(&mut self, callee: Callee, args: Vec<Self::Ref>) -> Result<Self::Ref, CompileError>;
}

/// Owned trees on the heap. Folding happens afterwards in a separate pass.
pub(crate) struct Heap;

impl NodeAlloc for Heap {
    type Ref = Node;

    fn constant(&mut self, value: f64) -> Result<Node, CompileError> {
        Ok(Node::Constant(value))
    }

    fn variable(&mut self, var: Var) -> Result<Node, CompileError> {
        Ok(Node::Variable(var))
    }

    fn call(&mut self, callee: Callee, args: Vec<Node>) -> Result<Node, CompileError> {
        Ok(Node::call(callee, args))
    }
}
