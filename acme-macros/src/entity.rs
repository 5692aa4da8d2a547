use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Fields, ItemStruct, Type, parse_macro_input, parse_quote};

use crate::derives::{ensure_leading_fields, merge_derives};

/// `#[entity(id = IdType)]`
///
/// 在最前补齐 `id` 与 `version` 两个字段（均 `#[serde(skip)]`，由存储与 ETag 承载），
/// 合并常用派生并实现 `acme_domain::entity::Entity`。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut id_ty: Option<Type> = None;
    let args = syn::meta::parser(|meta| {
        if !meta.path.is_ident("id") {
            return Err(meta.error("expected `id = Type`"));
        }
        if id_ty.is_some() {
            return Err(meta.error("duplicate `id`"));
        }
        id_ty = Some(meta.value()?.parse()?);
        Ok(())
    });
    parse_macro_input!(attr with args);
    let st = parse_macro_input!(item as ItemStruct);

    let expanded = match id_ty {
        Some(id_ty) => expand_struct(st, id_ty),
        None => Err(syn::Error::new(
            Span::call_site(),
            "#[entity] requires `id = Type`",
        )),
    };
    expanded.unwrap_or_else(syn::Error::into_compile_error).into()
}

fn expand_struct(mut st: ItemStruct, id_ty: Type) -> syn::Result<proc_macro2::TokenStream> {
    let Fields::Named(fields) = &mut st.fields else {
        return Err(syn::Error::new_spanned(
            &st.ident,
            "#[entity] requires a struct with named fields",
        ));
    };
    ensure_leading_fields(
        fields,
        [
            parse_quote! { #[serde(skip)] id: #id_ty },
            parse_quote! { #[serde(skip)] version: ::acme_domain::value_object::Version },
        ],
    );
    merge_derives(
        &mut st.attrs,
        vec![
            parse_quote!(Debug),
            parse_quote!(Clone),
            parse_quote!(Default),
            parse_quote!(serde::Serialize),
            parse_quote!(serde::Deserialize),
        ],
    );

    let name = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        #st

        impl #impl_generics ::acme_domain::entity::Entity for #name #ty_generics #where_clause {
            type Id = #id_ty;

            fn new(id: #id_ty, version: ::acme_domain::value_object::Version) -> Self {
                Self { id, version, ..::core::default::Default::default() }
            }

            fn id(&self) -> &#id_ty {
                &self.id
            }

            fn version(&self) -> ::acme_domain::value_object::Version {
                self.version
            }

            fn set_id(&mut self, id: #id_ty) {
                self.id = id;
            }

            fn set_version(&mut self, version: ::acme_domain::value_object::Version) {
                self.version = version;
            }
        }
    })
}
