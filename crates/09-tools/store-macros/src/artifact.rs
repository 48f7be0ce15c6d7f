//! 类型级构建块声明宏实现

use crate::utils::{declaration_fn_name, ensure_no_generics, parse_flags};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, Item, Result};

/// 构建块种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Feature,
    Reducer,
    Effect,
    Middleware,
}

impl ArtifactKind {
    fn name(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Reducer => "reducer",
            Self::Effect => "effect",
            Self::Middleware => "middleware",
        }
    }

    fn allowed_flags(self) -> &'static [&'static str] {
        match self {
            Self::Middleware => &["auto_load"],
            _ => &[],
        }
    }
}

/// 实现 `#[store_feature]` / `#[reducer]` / `#[effect]` / `#[middleware]`
pub fn artifact_impl(kind: ArtifactKind, args: TokenStream, input: TokenStream) -> TokenStream {
    match expand(kind, args, input) {
        Ok(expanded) => expanded,
        Err(e) => e.to_compile_error(),
    }
}

fn expand(kind: ArtifactKind, args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let flags = parse_flags(args, kind.allowed_flags())?;
    let item: Item = syn::parse2(input)?;

    let ident = declared_ident(&item)?;
    let declaration = match kind {
        ArtifactKind::Feature => {
            quote! { ::store_abstractions::catalog::Declaration::feature::<#ident>(::core::module_path!()) }
        }
        ArtifactKind::Reducer => {
            quote! { ::store_abstractions::catalog::Declaration::reducer::<#ident>(::core::module_path!()) }
        }
        ArtifactKind::Effect => {
            quote! { ::store_abstractions::catalog::Declaration::effect::<#ident>(::core::module_path!()) }
        }
        ArtifactKind::Middleware => {
            let auto_load = flags.iter().any(|flag| flag == "auto_load");
            quote! {
                ::store_abstractions::catalog::Declaration::middleware::<#ident>(
                    ::core::module_path!(),
                    #auto_load,
                )
            }
        }
    };

    let fn_name = declaration_fn_name(kind.name(), ident);
    Ok(quote! {
        #item

        // 程序启动时提交到全局声明目录
        #[::ctor::ctor]
        #[allow(non_snake_case)]
        fn #fn_name() {
            ::store_abstractions::catalog::global_catalog().submit(#declaration);
        }
    })
}

fn declared_ident(item: &Item) -> Result<&Ident> {
    match item {
        Item::Struct(item) => {
            ensure_no_generics(&item.generics)?;
            Ok(&item.ident)
        }
        Item::Enum(item) => {
            ensure_no_generics(&item.generics)?;
            Ok(&item.ident)
        }
        other => Err(Error::new_spanned(other, "只能标记结构体或枚举")),
    }
}
