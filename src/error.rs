use thiserror::Error;

/// Why an expression failed to compile.
///
/// Every variant carries a 1-based byte offset into the source (see [`CompileError::offset`]).
/// Zero is never used so that callers can keep treating `0` as "no error".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("syntax error at position {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },
    #[error("unknown identifier '{name}' at position {offset}")]
    UnknownIdent { name: String, offset: usize },
    #[error("unexpected character '{ch}' at position {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("invalid number at position {offset}")]
    InvalidNumber { offset: usize },
    #[error("expression nested deeper than {limit} levels at position {offset}")]
    TooDeep { limit: usize, offset: usize },
    #[error("expression needs more than {limit} nodes")]
    OutOfNodes { limit: usize },
}

impl CompileError {
    /// 1-based position where the problem was detected.
    pub fn offset(&self) -> usize {
        match self {
            CompileError::Syntax { offset, .. }
            | CompileError::UnknownIdent { offset, .. }
            | CompileError::UnexpectedChar { offset, .. }
            | CompileError::InvalidNumber { offset }
            | CompileError::TooDeep { offset, .. } => (*offset).max(1),
            CompileError::OutOfNodes { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("invalid binding name '{0}': expected [a-z][a-z0-9_]*")]
    InvalidName(String),
    #[error("binding already exists: {0}")]
    Exists(String),
    #[error("unknown native function: {0}")]
    UnknownFunction(String),
    #[error("native function '{0}' takes a context; register it with a context value")]
    NeedsContext(String),
    #[error("native function '{0}' does not take a context")]
    ContextNotAccepted(String),
}
