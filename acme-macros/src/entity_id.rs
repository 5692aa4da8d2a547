use proc_macro::TokenStream;
use quote::quote;
use syn::{Fields, ItemStruct, LitBool, Path, parse_macro_input, parse_quote};

use crate::derives::merge_derives;

/// `#[entity_id(copy = bool, generate = path)]`
///
/// 只接受单字段 tuple struct。`generate` 指向一个无参函数，例如 `uuid::Uuid::new_v4`，
/// 用于生成 `generate()`。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut copy: Option<bool> = None;
    let mut generate: Option<Path> = None;
    let args = syn::meta::parser(|meta| {
        if meta.path.is_ident("copy") {
            if copy.is_some() {
                return Err(meta.error("duplicate `copy`"));
            }
            copy = Some(meta.value()?.parse::<LitBool>()?.value);
            Ok(())
        } else if meta.path.is_ident("generate") {
            if generate.is_some() {
                return Err(meta.error("duplicate `generate`"));
            }
            generate = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `copy` or `generate`"))
        }
    });
    parse_macro_input!(attr with args);
    let st = parse_macro_input!(item as ItemStruct);

    expand_struct(st, copy.unwrap_or(false), generate)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_struct(
    mut st: ItemStruct,
    copy: bool,
    generate: Option<Path>,
) -> syn::Result<proc_macro2::TokenStream> {
    let inner = match &st.fields {
        Fields::Unnamed(f) if f.unnamed.len() == 1 => f.unnamed[0].ty.clone(),
        _ => {
            return Err(syn::Error::new_spanned(
                &st.ident,
                "#[entity_id] requires a tuple struct with exactly one field",
            ));
        }
    };

    let mut derives: Vec<Path> = vec![
        parse_quote!(Debug),
        parse_quote!(Default),
        parse_quote!(Clone),
        parse_quote!(PartialEq),
        parse_quote!(Eq),
        parse_quote!(Hash),
        parse_quote!(serde::Serialize),
        parse_quote!(serde::Deserialize),
    ];
    if copy {
        derives.push(parse_quote!(Copy));
    }
    merge_derives(&mut st.attrs, derives);

    let name = &st.ident;
    let generate = generate.map(|f| {
        quote! {
            impl #name {
                /// 生成新的标识
                pub fn generate() -> Self {
                    Self(#f())
                }
            }
        }
    });

    Ok(quote! {
        #st

        impl #name {
            pub fn new(value: #inner) -> Self {
                Self(value)
            }

            pub fn into_inner(self) -> #inner {
                self.0
            }
        }

        #generate

        impl ::core::convert::From<#inner> for #name {
            fn from(value: #inner) -> Self {
                Self(value)
            }
        }

        impl ::core::convert::AsRef<#inner> for #name {
            fn as_ref(&self) -> &#inner {
                &self.0
            }
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for #name {
            type Err = <#inner as ::core::str::FromStr>::Err;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    })
}
