use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat, PatType, Type, TypeReference};

const MAX_ARITY: usize = 7;

// #[function] / #[function(pure)]
// Supports up to seven f64 parameters and optionally a single context
// parameter of type &Ctx at any position in the parameter list. The context
// parameter is NOT counted toward arity; functions that take one are
// registered as closures and receive the context the engine was given.
#[proc_macro_attribute]
pub fn function(attr: TokenStream, item: TokenStream) -> TokenStream {
    let func = parse_macro_input!(item as ItemFn);
    let sig = &func.sig;
    let ident = &sig.ident;

    let pure = if attr.is_empty() {
        false
    } else {
        let flag = parse_macro_input!(attr as Ident);
        if flag != "pure" {
            return syn::Error::new_spanned(&flag, "#[function] only accepts the `pure` flag")
                .to_compile_error()
                .into();
        }
        true
    };

    // Verify return type is f64
    let ret_ok = match &sig.output {
        syn::ReturnType::Type(_, ty) => matches!(**ty, Type::Path(ref tp) if tp.path.is_ident("f64")),
        syn::ReturnType::Default => false,
    };
    if !ret_ok {
        return syn::Error::new_spanned(&sig.output, "#[function] requires return type f64")
            .to_compile_error()
            .into();
    }

    enum ParamKind {
        Num(Ident),
        Ctx { name: Ident, elem_ty: Box<Type> },
    }

    let mut ordered: Vec<ParamKind> = Vec::new();
    let mut numeric_params: Vec<PatType> = Vec::new();
    let mut has_ctx = false;

    for input in &sig.inputs {
        match input {
            FnArg::Typed(pt) => {
                let pat_ident = match &*pt.pat {
                    Pat::Ident(pi) => pi.ident.clone(),
                    other => {
                        return syn::Error::new_spanned(
                            other,
                            "#[function] requires simple identifier parameters",
                        )
                        .to_compile_error()
                        .into()
                    }
                };

                match &*pt.ty {
                    Type::Path(tp) if tp.path.is_ident("f64") => {
                        ordered.push(ParamKind::Num(pat_ident));
                        numeric_params.push(pt.clone());
                    }
                    Type::Reference(TypeReference { elem, mutability, .. }) => {
                        if mutability.is_some() {
                            return syn::Error::new_spanned(
                                &pt.ty,
                                "#[function] contexts are shared; take &Ctx, not &mut Ctx",
                            )
                            .to_compile_error()
                            .into();
                        }
                        if has_ctx {
                            return syn::Error::new_spanned(
                                &pt.ty,
                                "#[function] supports at most one context parameter (&Ctx)",
                            )
                            .to_compile_error()
                            .into();
                        }
                        has_ctx = true;
                        ordered.push(ParamKind::Ctx { name: pat_ident, elem_ty: elem.clone() });
                    }
                    other => {
                        return syn::Error::new_spanned(
                            other,
                            "#[function] only supports f64 parameters and at most one &Ctx context parameter",
                        )
                        .to_compile_error()
                        .into();
                    }
                }
            }
            _ => {
                return syn::Error::new_spanned(
                    input,
                    "#[function] does not support receiver parameters",
                )
                .to_compile_error()
                .into();
            }
        }
    }

    let arity = numeric_params.len();
    if arity > MAX_ARITY {
        return syn::Error::new_spanned(
            &sig.inputs,
            "#[function] supports up to 7 numeric parameters",
        )
        .to_compile_error()
        .into();
    }
    if has_ctx && pure {
        return syn::Error::new_spanned(
            &sig.inputs,
            "#[function(pure)] cannot take a context parameter",
        )
        .to_compile_error()
        .into();
    }

    let name_str = ident.to_string();

    let native = if has_ctx {
        let shim_ident = format_ident!("__recalc_shim_{}", ident);
        let variant = format_ident!("C{}", arity);
        let shim_args = numeric_params.iter().map(|pt| quote! { #pt });

        let mut call_args = Vec::with_capacity(ordered.len());
        let mut ctx_bind = quote! {};
        for p in &ordered {
            match p {
                ParamKind::Num(id) => call_args.push(quote! { #id }),
                ParamKind::Ctx { name, elem_ty } => {
                    ctx_bind = quote! {
                        let #name: &#elem_ty = match __recalc_ctx.downcast_ref::<#elem_ty>() {
                            Some(c) => c,
                            None => return f64::NAN,
                        };
                    };
                    call_args.push(quote! { #name });
                }
            }
        }

        quote! {
            #[allow(non_snake_case)]
            fn #shim_ident(__recalc_ctx: &::recalc::Context, #( #shim_args ),* ) -> f64 {
                #ctx_bind
                #ident( #( #call_args ),* )
            }

            ::recalc::inventory::submit! {
                ::recalc::FnMeta {
                    name: #name_str,
                    mod_path: module_path!(),
                    native: ::recalc::Native::Closure(::recalc::CtxFunc::#variant(#shim_ident)),
                }
            }
        }
    } else {
        let variant = format_ident!("F{}", arity);
        quote! {
            ::recalc::inventory::submit! {
                ::recalc::FnMeta {
                    name: #name_str,
                    mod_path: module_path!(),
                    native: ::recalc::Native::Function {
                        func: ::recalc::Func::#variant(#ident),
                        pure: #pure,
                    },
                }
            }
        }
    };

    let output = quote! {
        #func

        #native
    };

    output.into()
}
