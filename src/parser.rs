use crate::alloc::NodeAlloc;
use crate::engine::{Config, PowAssoc};
use crate::error::CompileError;
use crate::lexer::{Callee, Lexer, Op, Token};
use crate::resolver::Binding;

/// A subtree under construction and the number of levels it spans.
struct Built<R> {
    node: R,
    height: usize,
}

/// Recursive-descent parser over the ladder
/// `list -> expr -> term -> factor -> power -> base`.
///
/// Nodes are handed to `A` as soon as their operands are complete, so an
/// allocator that runs out stops the parse on the spot.
pub(crate) struct Parser<'a, A: NodeAlloc> {
    lex: Lexer<'a>,
    look: Token,
    at: usize,
    config: &'a Config,
    depth: usize,
    nodes: usize,
    alloc: A,
}

impl<'a, A: NodeAlloc> Parser<'a, A> {
    pub(crate) fn new(
        s: &'a str,
        bindings: &'a [Binding],
        config: &'a Config,
        alloc: A,
    ) -> Result<Self, CompileError> {
        let mut lex = Lexer::new(s, bindings, config);
        let (at, look) = lex.next_token()?;
        Ok(Self { lex, look, at, config, depth: 0, nodes: 0, alloc })
    }
    fn bump(&mut self) -> Result<(), CompileError> {
        let (at, look) = self.lex.next_token()?;
        self.at = at;
        self.look = look;
        Ok(())
    }
    fn error(&self, reason: &'static str) -> CompileError {
        CompileError::Syntax { offset: self.at + 1, reason }
    }
    fn expect_rparen(&mut self) -> Result<(), CompileError> {
        if matches!(self.look, Token::RParen) {
            self.bump()
        } else {
            Err(self.error("expected ')'"))
        }
    }
    fn infix(&self) -> Option<Op> {
        match self.look {
            Token::Infix(op) => Some(op),
            _ => None,
        }
    }
    /// Counts a node against the configured budget.
    fn count(&mut self) -> Result<(), CompileError> {
        self.nodes += 1;
        if self.nodes > self.config.max_nodes {
            return Err(CompileError::OutOfNodes { limit: self.config.max_nodes });
        }
        Ok(())
    }
    fn leaf(&mut self, token: Token) -> Result<Built<A::Ref>, CompileError> {
        self.count()?;
        let node = match token {
            Token::Num(v) => self.alloc.constant(v)?,
            Token::Var(var) => self.alloc.variable(var)?,
            _ => return Err(self.error("expected number or variable")),
        };
        Ok(Built { node, height: 1 })
    }
    // Every walk over a finished tree recurses once per level, so the height
    // is capped here rather than trusted to the node budget.
    fn node(&mut self, callee: Callee, args: Vec<Built<A::Ref>>) -> Result<Built<A::Ref>, CompileError> {
        self.count()?;
        let height = 1 + args.iter().map(|a| a.height).max().unwrap_or(0);
        if height > self.config.max_height {
            return Err(CompileError::TooDeep { limit: self.config.max_height, offset: self.at + 1 });
        }
        let args = args.into_iter().map(|a| a.node).collect();
        let node = self.alloc.call(callee, args)?;
        Ok(Built { node, height })
    }
    fn apply(&mut self, op: Op, args: Vec<Built<A::Ref>>) -> Result<Built<A::Ref>, CompileError> {
        self.node(Callee::operator(op), args)
    }

    /// Parses the whole input. Anything left after the top-level list is an error.
    ///
    /// Returns the root and the number of nodes built before any folding.
    pub(crate) fn parse(mut self) -> Result<(A::Ref, usize), CompileError> {
        let built = self.list()?;
        if !matches!(self.look, Token::Eof) {
            return Err(self.error("unexpected trailing input"));
        }
        Ok((built.node, self.nodes))
    }
    // list = expr {',' expr}
    fn list(&mut self) -> Result<Built<A::Ref>, CompileError> {
        let mut node = self.expr()?;
        while matches!(self.look, Token::Comma) {
            self.bump()?;
            let rhs = self.expr()?;
            node = self.apply(Op::Comma, vec![node, rhs])?;
        }
        Ok(node)
    }
    // expr = term {('+' | '-') term}
    fn expr(&mut self) -> Result<Built<A::Ref>, CompileError> {
        let mut node = self.term()?;
        while let Some(op @ (Op::Add | Op::Sub)) = self.infix() {
            self.bump()?;
            let rhs = self.term()?;
            node = self.apply(op, vec![node, rhs])?;
        }
        Ok(node)
    }
    // term = factor {('*' | '/' | '%') factor}
    fn term(&mut self) -> Result<Built<A::Ref>, CompileError> {
        let mut node = self.factor()?;
        while let Some(op @ (Op::Mul | Op::Div | Op::Mod)) = self.infix() {
            self.bump()?;
            let rhs = self.factor()?;
            node = self.apply(op, vec![node, rhs])?;
        }
        Ok(node)
    }
    // factor = power {'^' power}
    //
    // A leading sign on the first operand is held back and applied to the whole
    // chain, so `-2^2` is `-(2^2)` in both associativity modes.
    fn factor(&mut self) -> Result<Built<A::Ref>, CompileError> {
        let (negated, first) = self.power()?;
        let mut node = first;
        if self.infix() == Some(Op::Pow) {
            match self.config.pow_assoc {
                PowAssoc::Left => {
                    while self.infix() == Some(Op::Pow) {
                        self.bump()?;
                        let rhs = self.signed_power()?;
                        node = self.apply(Op::Pow, vec![node, rhs])?;
                    }
                }
                PowAssoc::Right => {
                    let mut operands = vec![node];
                    while self.infix() == Some(Op::Pow) {
                        self.bump()?;
                        operands.push(self.signed_power()?);
                    }
                    // `operands` holds at least the first operand.
                    let mut acc = match operands.pop() {
                        Some(last) => last,
                        None => return Err(self.error("expected operand")),
                    };
                    while let Some(lhs) = operands.pop() {
                        acc = self.apply(Op::Pow, vec![lhs, acc])?;
                    }
                    node = acc;
                }
            }
        }
        self.with_sign(negated, node)
    }
    // power = {('+' | '-')} base
    //
    // Returns whether the run of signs is net negative, separately from the base.
    fn power(&mut self) -> Result<(bool, Built<A::Ref>), CompileError> {
        let mut negated = false;
        while let Some(op @ (Op::Add | Op::Sub)) = self.infix() {
            if op == Op::Sub {
                negated = !negated;
            }
            self.bump()?;
        }
        Ok((negated, self.base()?))
    }
    fn signed_power(&mut self) -> Result<Built<A::Ref>, CompileError> {
        let (negated, node) = self.power()?;
        self.with_sign(negated, node)
    }
    fn with_sign(&mut self, negated: bool, node: Built<A::Ref>) -> Result<Built<A::Ref>, CompileError> {
        if negated {
            self.apply(Op::Negate, vec![node])
        } else {
            Ok(node)
        }
    }
    // base = number | variable | function0 ['(' ')'] | function1 power
    //      | functionN '(' expr {',' expr} ')' | '(' list ')'
    fn base(&mut self) -> Result<Built<A::Ref>, CompileError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(CompileError::TooDeep { limit: self.config.max_depth, offset: self.at + 1 });
        }
        let node = self.primary();
        self.depth -= 1;
        node
    }
    fn primary(&mut self) -> Result<Built<A::Ref>, CompileError> {
        match self.look.clone() {
            tok @ (Token::Num(_) | Token::Var(_)) => {
                self.bump()?;
                self.leaf(tok)
            }
            Token::Call(callee) => {
                self.bump()?;
                self.call(callee)
            }
            Token::LParen => {
                self.bump()?;
                let node = self.list()?;
                self.expect_rparen()?;
                Ok(node)
            }
            Token::Eof => Err(self.error("unexpected end of input")),
            _ => Err(self.error("expected number, identifier, or '('")),
        }
    }
    fn call(&mut self, callee: Callee) -> Result<Built<A::Ref>, CompileError> {
        let arity = callee.arity();
        let args = match arity {
            0 => {
                if matches!(self.look, Token::LParen) {
                    self.bump()?;
                    self.expect_rparen()?;
                }
                Vec::new()
            }
            1 => vec![self.signed_power()?],
            _ => {
                if !matches!(self.look, Token::LParen) {
                    return Err(self.error("expected '(' after function name"));
                }
                self.bump()?;
                let mut args = Vec::with_capacity(arity);
                loop {
                    args.push(self.expr()?);
                    if args.len() == arity || !matches!(self.look, Token::Comma) {
                        break;
                    }
                    self.bump()?;
                }
                if args.len() < arity {
                    return Err(self.error("too few arguments"));
                }
                if matches!(self.look, Token::Comma) {
                    return Err(self.error("too many arguments"));
                }
                self.expect_rparen()?;
                args
            }
        };
        self.node(callee, args)
    }
}
