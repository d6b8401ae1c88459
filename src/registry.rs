use crate::rt_types::{CtxFunc, Func};

/// How a natively declared function is called.
#[derive(Clone, Copy, Debug)]
pub enum Native {
    Function { func: Func, pure: bool },
    Closure(CtxFunc),
}

/// Link-time record emitted by `#[function]`.
#[derive(Debug)]
pub struct FnMeta {
    pub name: &'static str,
    pub mod_path: &'static str,
    pub native: Native,
}

inventory::collect!(FnMeta);

/// Looks up a `#[function]` by name across the whole binary.
pub fn find_native(name: &str) -> Option<&'static FnMeta> {
    inventory::iter::<FnMeta>.into_iter().find(|meta| meta.name == name)
}

/// Every `#[function]` linked into the binary.
pub fn natives() -> impl Iterator<Item = &'static FnMeta> {
    inventory::iter::<FnMeta>.into_iter()
}
