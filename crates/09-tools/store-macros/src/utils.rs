//! 宏工具函数

use proc_macro2::Span;
use syn::{
    parse::Parser, punctuated::Punctuated, Error, FnArg, Generics, Ident, Meta, Result, Token,
    Type, TypeReference,
};

/// 声明函数名：`__store_declare_<kind>_<小写类型名>`
pub fn declaration_fn_name(kind: &str, ident: &Ident) -> Ident {
    Ident::new(
        &format!(
            "__store_declare_{}_{}",
            kind,
            ident.to_string().to_lowercase()
        ),
        Span::call_site(),
    )
}

/// 解析标记参数，只接受不带值的标识
pub fn parse_flags(args: proc_macro2::TokenStream, allowed: &[&str]) -> Result<Vec<String>> {
    let parsed = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;

    let mut flags = Vec::new();
    for meta in parsed {
        match meta {
            Meta::Path(path) => match path.get_ident() {
                Some(ident) if allowed.iter().any(|flag| ident == *flag) => {
                    flags.push(ident.to_string());
                }
                _ => return Err(Error::new_spanned(&path, "不支持的参数")),
            },
            other => return Err(Error::new_spanned(other, "不支持的参数")),
        }
    }

    Ok(flags)
}

/// 声明类型不能带泛型参数
pub fn ensure_no_generics(generics: &Generics) -> Result<()> {
    if generics.params.is_empty() && generics.where_clause.is_none() {
        Ok(())
    } else {
        Err(Error::new_spanned(generics, "声明类型不能带泛型参数"))
    }
}

/// 取出 `&T` 参数中的 `T`
pub fn referenced_type(arg: &FnArg) -> Result<&Type> {
    match arg {
        FnArg::Typed(pat_type) => match pat_type.ty.as_ref() {
            Type::Reference(TypeReference {
                mutability: None,
                elem,
                ..
            }) => Ok(elem.as_ref()),
            other => Err(Error::new_spanned(other, "参数必须是共享引用")),
        },
        FnArg::Receiver(receiver) => Err(Error::new_spanned(receiver, "这里不能是 self 参数")),
    }
}

/// 是否为类型擦除的动作类型 `Action`
pub fn is_erased_action(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Action" && segment.arguments.is_empty())
            .unwrap_or(false),
        Type::Paren(paren) => is_erased_action(&paren.elem),
        Type::Group(group) => is_erased_action(&group.elem),
        _ => false,
    }
}
