use std::sync::Arc;

use crate::error::BindError;
use crate::rt_types::{Context, CtxFunc, Func, Var};

/// What a bound name resolves to.
#[derive(Clone, Debug)]
pub enum BindingKind {
    /// Read through on every evaluation.
    Variable(Var),
    /// A plain function. `pure` functions are folded when all operands are constant.
    Function { func: Func, pure: bool },
    /// A function with an opaque context. Never folded.
    Closure { func: CtxFunc, ctx: Arc<Context> },
}

/// A caller-supplied name made visible to expressions.
///
/// Bindings are consulted before the builtin catalogue, so a binding named `sin`
/// replaces the builtin for that compile.
#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
}

impl Binding {
    pub fn var(name: impl Into<String>, var: &Var) -> Self {
        Self { name: name.into(), kind: BindingKind::Variable(var.clone()) }
    }

    /// A function that is assumed to have side effects or hidden inputs.
    pub fn function(name: impl Into<String>, func: Func) -> Self {
        Self { name: name.into(), kind: BindingKind::Function { func, pure: false } }
    }

    /// A function whose result depends only on its arguments.
    pub fn pure_function(name: impl Into<String>, func: Func) -> Self {
        Self { name: name.into(), kind: BindingKind::Function { func, pure: true } }
    }

    pub fn closure<T>(name: impl Into<String>, func: CtxFunc, ctx: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::closure_shared(name, func, Arc::new(ctx))
    }

    /// Like [`Binding::closure`], for a context that is already shared.
    pub fn closure_shared(name: impl Into<String>, func: CtxFunc, ctx: Arc<Context>) -> Self {
        Self { name: name.into(), kind: BindingKind::Closure { func, ctx } }
    }

    /// Operand count for callables, `None` for variables.
    pub fn arity(&self) -> Option<usize> {
        match &self.kind {
            BindingKind::Variable(_) => None,
            BindingKind::Function { func, .. } => Some(func.arity()),
            BindingKind::Closure { func, .. } => Some(func.arity()),
        }
    }
}

/// Identifiers the lexer can produce: a lowercase ASCII letter followed by
/// lowercase letters, digits or underscores.
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_lowercase() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Linear lookup over a binding slice. First match wins.
pub(crate) fn find<'b>(bindings: &'b [Binding], name: &str) -> Option<&'b Binding> {
    bindings.iter().find(|b| b.name == name)
}

/// A validated binding table: names are well formed and unique.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, binding: Binding) -> Result<(), BindError> {
        if !is_valid_name(&binding.name) {
            return Err(BindError::InvalidName(binding.name));
        }
        if find(&self.entries, &binding.name).is_some() {
            return Err(BindError::Exists(binding.name));
        }
        self.entries.push(binding);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        find(&self.entries, name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        let idx = self.entries.iter().position(|b| b.name == name)?;
        Some(self.entries.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Binding] {
        &self.entries
    }
}

impl TryFrom<Vec<Binding>> for Bindings {
    type Error = BindError;

    fn try_from(list: Vec<Binding>) -> Result<Self, Self::Error> {
        let mut table = Bindings::new();
        for binding in list {
            table.insert(binding)?;
        }
        Ok(table)
    }
}
