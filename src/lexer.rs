use std::sync::Arc;

use crate::builtins;
use crate::engine::Config;
use crate::error::CompileError;
use crate::resolver::{self, Binding, BindingKind};
use crate::rt_types::{Context, CtxFunc, Func, Var};

/// Operators known to the grammar, decided once when the token is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Comma,
    Negate,
}

impl Op {
    pub(crate) fn func(self) -> Func {
        match self {
            Op::Add => Func::F2(add),
            Op::Sub => Func::F2(sub),
            Op::Mul => Func::F2(mul),
            Op::Div => Func::F2(div),
            Op::Pow => Func::F2(f64::powf),
            Op::Mod => Func::F2(rem),
            Op::Comma => Func::F2(comma),
            Op::Negate => Func::F1(negate),
        }
    }
}

fn add(a: f64, b: f64) -> f64 {
    a + b
}
fn sub(a: f64, b: f64) -> f64 {
    a - b
}
fn mul(a: f64, b: f64) -> f64 {
    a * b
}
fn div(a: f64, b: f64) -> f64 {
    a / b
}
fn rem(a: f64, b: f64) -> f64 {
    a % b
}
fn comma(_a: f64, b: f64) -> f64 {
    b
}
fn negate(a: f64) -> f64 {
    -a
}

/// A resolved callable identifier.
#[derive(Clone, Debug)]
pub(crate) enum Callee {
    Function { func: Func, pure: bool },
    Closure { func: CtxFunc, ctx: Arc<Context> },
}

impl Callee {
    /// Operators are pure two-operand functions, or one operand for negation.
    pub(crate) fn operator(op: Op) -> Callee {
        Callee::Function { func: op.func(), pure: true }
    }

    pub(crate) fn arity(&self) -> usize {
        match self {
            Callee::Function { func, .. } => func.arity(),
            Callee::Closure { func, .. } => func.arity(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Token {
    Num(f64),
    Var(Var),
    Call(Callee),
    Infix(Op),
    LParen,
    RParen,
    Comma,
    Eof,
}

pub(crate) struct Lexer<'a> {
    text: &'a str,
    src: &'a [u8],
    i: usize,
    bindings: &'a [Binding],
    config: &'a Config,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(s: &'a str, bindings: &'a [Binding], config: &'a Config) -> Self {
        Self {
            text: s,
            src: s.as_bytes(),
            i: 0,
            bindings,
            config,
        }
    }
    fn peek(&self) -> Option<u8> {
        self.src.get(self.i).copied()
    }
    fn bump(&mut self) -> Option<u8> {
        let ch = self.src.get(self.i).copied();
        if ch.is_some() {
            self.i += 1;
        }
        ch
    }
    // Only space, tab, CR and LF separate tokens.
    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.i += 1;
        }
    }
    /// Reads the next token and returns it with the byte offset it starts at.
    pub(crate) fn next_token(&mut self) -> Result<(usize, Token), CompileError> {
        self.skip_ws();
        let start = self.i;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok((start, Token::Eof)),
        };
        let tok = match c {
            b'0'..=b'9' | b'.' => self.lex_number()?,
            b'a'..=b'z' => self.lex_ident()?,
            _ => {
                self.bump();
                match c {
                    b'+' => Token::Infix(Op::Add),
                    b'-' => Token::Infix(Op::Sub),
                    b'*' => Token::Infix(Op::Mul),
                    b'/' => Token::Infix(Op::Div),
                    b'^' => Token::Infix(Op::Pow),
                    b'%' => Token::Infix(Op::Mod),
                    b'(' => Token::LParen,
                    b')' => Token::RParen,
                    b',' => Token::Comma,
                    _ => {
                        let ch = self.text[start..].chars().next().unwrap_or('\u{fffd}');
                        return Err(CompileError::UnexpectedChar { ch, offset: start + 1 });
                    }
                }
            }
        };
        Ok((start, tok))
    }
    fn digits(&mut self) -> usize {
        let from = self.i;
        while let Some(b'0'..=b'9') = self.peek() {
            self.i += 1;
        }
        self.i - from
    }
    fn lex_number(&mut self) -> Result<Token, CompileError> {
        let start = self.i;
        let mut count = self.digits();
        if self.peek() == Some(b'.') {
            self.i += 1;
            count += self.digits();
        }
        if count == 0 {
            return Err(CompileError::InvalidNumber { offset: start + 1 });
        }
        // The exponent belongs to the number only when digits follow; otherwise
        // the `e` is left for the next token.
        if let Some(b'e' | b'E') = self.peek() {
            let mark = self.i;
            self.i += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.i += 1;
            }
            if self.digits() == 0 {
                self.i = mark;
            }
        }
        let s = &self.text[start..self.i];
        let v: f64 = s
            .parse()
            .map_err(|_| CompileError::InvalidNumber { offset: start + 1 })?;
        Ok(Token::Num(v))
    }
    fn lex_ident(&mut self) -> Result<Token, CompileError> {
        let start = self.i;
        while let Some(c) = self.peek() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_' {
                self.i += 1;
            } else {
                break;
            }
        }
        let name = &self.text[start..self.i];
        if let Some(binding) = resolver::find(self.bindings, name) {
            return Ok(match &binding.kind {
                BindingKind::Variable(var) => Token::Var(var.clone()),
                BindingKind::Function { func, pure } => Token::Call(Callee::Function {
                    func: *func,
                    pure: *pure,
                }),
                BindingKind::Closure { func, ctx } => Token::Call(Callee::Closure {
                    func: *func,
                    ctx: ctx.clone(),
                }),
            });
        }
        match builtins::lookup(name, self.config.log_base) {
            Some(func) => Ok(Token::Call(Callee::Function { func, pure: true })),
            None => Err(CompileError::UnknownIdent {
                name: name.to_string(),
                offset: start + 1,
            }),
        }
    }
}
