use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{Item, LitBool, Path, parse_macro_input, parse_quote};

use crate::derives::merge_derives;

/// `#[value_object(debug = bool, default = bool)]`
///
/// 用于结构体或枚举，合并 Clone/PartialEq/Eq/Serialize/Deserialize 派生。
/// `debug` 与 `default` 默认开启；没有 `#[default]` 变体的枚举需写 `default = false`。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut debug = true;
    let mut default = true;
    let args = syn::meta::parser(|meta| {
        let slot = if meta.path.is_ident("debug") {
            &mut debug
        } else if meta.path.is_ident("default") {
            &mut default
        } else {
            return Err(meta.error("expected `debug` or `default`"));
        };
        *slot = meta.value()?.parse::<LitBool>()?.value;
        Ok(())
    });
    parse_macro_input!(attr with args);
    let mut item = parse_macro_input!(item as Item);

    let mut derives: Vec<Path> = Vec::new();
    if debug {
        derives.push(parse_quote!(Debug));
    }
    if default {
        derives.push(parse_quote!(Default));
    }
    derives.extend([
        parse_quote!(Clone),
        parse_quote!(PartialEq),
        parse_quote!(Eq),
        parse_quote!(serde::Serialize),
        parse_quote!(serde::Deserialize),
    ]);

    let attrs = match &mut item {
        Item::Struct(st) => &mut st.attrs,
        Item::Enum(en) => &mut en.attrs,
        other => {
            return syn::Error::new_spanned(other, "#[value_object] only supports struct or enum")
                .into_compile_error()
                .into();
        }
    };
    merge_derives(attrs, derives);
    item.into_token_stream().into()
}
