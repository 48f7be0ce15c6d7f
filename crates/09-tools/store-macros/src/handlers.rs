//! 松散方法声明宏实现
//!
//! `#[handlers]` 标记在固有 `impl` 块上，块内用 `#[reduce]` 或
//! `#[effect_method]` 标记的方法成为松散方法声明。

use crate::utils::{declaration_fn_name, ensure_no_generics, is_erased_action, referenced_type};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, Error, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Result, ReturnType, Type,
};

/// 方法标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodMarker {
    Reduce,
    EffectMethod,
}

/// 实现 `#[handlers]`
pub fn handlers_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    match expand(args, input) {
        Ok(expanded) => expanded,
        Err(e) => e.to_compile_error(),
    }
}

fn expand(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    if !args.is_empty() {
        return Err(Error::new_spanned(args, "#[handlers] 不接受参数"));
    }

    let mut item_impl: ItemImpl = syn::parse2(input)?;
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(Error::new_spanned(path, "#[handlers] 只能标记固有 impl 块"));
    }
    ensure_no_generics(&item_impl.generics)?;

    let self_ty = item_impl.self_ty.as_ref().clone();
    let self_ident = self_ident(&self_ty)?;

    let mut declarations = Vec::new();
    let mut first_method = None;
    for item in &mut item_impl.items {
        if let ImplItem::Fn(method) = item {
            if let Some(marker) = take_marker(&mut method.attrs)? {
                first_method.get_or_insert_with(|| method.sig.ident.clone());
                declarations.push(match marker {
                    MethodMarker::Reduce => reduce_declaration(&self_ty, method)?,
                    MethodMarker::EffectMethod => effect_declaration(&self_ty, method)?,
                });
            }
        }
    }

    let Some(first_method) = first_method else {
        return Err(Error::new_spanned(
            &item_impl.self_ty,
            "impl 块中没有 #[reduce] 或 #[effect_method] 方法",
        ));
    };

    // 同一类型可以有多个 impl 块，用第一个标记方法区分
    let block_ident = Ident::new(
        &format!(
            "{}_{}",
            self_ident,
            first_method.to_string().trim_start_matches("r#")
        ),
        first_method.span(),
    );
    let fn_name = declaration_fn_name("handlers", &block_ident);
    Ok(quote! {
        #item_impl

        // 程序启动时提交到全局声明目录
        #[::ctor::ctor]
        #[allow(non_snake_case)]
        fn #fn_name() {
            let catalog = ::store_abstractions::catalog::global_catalog();
            #( catalog.submit(#declarations); )*
        }
    })
}

fn self_ident(self_ty: &Type) -> Result<Ident> {
    match self_ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.clone())
            .ok_or_else(|| Error::new_spanned(self_ty, "无法识别的类型")),
        other => Err(Error::new_spanned(other, "#[handlers] 只能标记具名类型的 impl 块")),
    }
}

/// 取出并移除方法上的标记属性
fn take_marker(attrs: &mut Vec<Attribute>) -> Result<Option<MethodMarker>> {
    let mut marker = None;
    let mut error = None;
    attrs.retain(|attr| {
        let found = if attr.path().is_ident("reduce") {
            MethodMarker::Reduce
        } else if attr.path().is_ident("effect_method") {
            MethodMarker::EffectMethod
        } else {
            return true;
        };
        if marker.replace(found).is_some() {
            error = Some(Error::new_spanned(attr, "一个方法只能有一个标记"));
        }
        false
    });

    match error {
        Some(error) => Err(error),
        None => Ok(marker),
    }
}

/// 检查 `&self` 接收者并返回其余参数
fn typed_args(method: &ImplItemFn, expected: usize) -> Result<Vec<&FnArg>> {
    let mut inputs = method.sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(Error::new_spanned(
                &method.sig,
                "松散方法的第一个参数必须是 &self",
            ))
        }
    }

    let args: Vec<&FnArg> = inputs.collect();
    if args.len() != expected {
        return Err(Error::new_spanned(
            &method.sig.inputs,
            format!("松散方法除 &self 外需要 {} 个参数", expected),
        ));
    }
    if !method.sig.generics.params.is_empty() {
        return Err(Error::new_spanned(&method.sig.generics, "松散方法不能带泛型参数"));
    }
    Ok(args)
}

/// `fn(&self, &State, &A) -> State`
fn reduce_declaration(self_ty: &Type, method: &ImplItemFn) -> Result<TokenStream> {
    let args = typed_args(method, 2)?;
    let state_ty = referenced_type(args[0])?;
    let action_ty = referenced_type(args[1])?;
    if matches!(method.sig.output, ReturnType::Default) {
        return Err(Error::new_spanned(&method.sig, "#[reduce] 方法必须返回新状态"));
    }

    let method_ident = &method.sig.ident;
    let method_name = method_ident.to_string();
    let body = if is_erased_action(action_ty) {
        quote! { ::core::option::Option::Some(<#self_ty>::#method_ident(this, state, action)) }
    } else {
        quote! {
            action
                .downcast_ref::<#action_ty>()
                .map(|action| <#self_ty>::#method_ident(this, state, action))
        }
    };

    Ok(quote! {
        ::store_abstractions::catalog::Declaration::reducer_method::<#self_ty, #state_ty>(
            ::core::module_path!(),
            #method_name,
            |this: &#self_ty, state: &#state_ty, action: &::store_abstractions::Action| #body,
        )
    })
}

/// `fn(&self, &A, &dyn Dispatcher)`
fn effect_declaration(self_ty: &Type, method: &ImplItemFn) -> Result<TokenStream> {
    let args = typed_args(method, 2)?;
    let action_ty = referenced_type(args[0])?;
    referenced_type(args[1])?;

    let method_ident = &method.sig.ident;
    let method_name = method_ident.to_string();
    let body = if is_erased_action(action_ty) {
        quote! { <#self_ty>::#method_ident(this, action, dispatcher) }
    } else {
        quote! {
            if let ::core::option::Option::Some(action) = action.downcast_ref::<#action_ty>() {
                <#self_ty>::#method_ident(this, action, dispatcher)
            }
        }
    };

    Ok(quote! {
        ::store_abstractions::catalog::Declaration::effect_method::<#self_ty>(
            ::core::module_path!(),
            #method_name,
            |this: &#self_ty,
             action: &::store_abstractions::Action,
             dispatcher: &dyn ::store_abstractions::Dispatcher| { #body },
        )
    })
}
