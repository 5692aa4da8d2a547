use syn::punctuated::Punctuated;
use syn::{Attribute, Field, FieldsNamed, Path, Token};

/// 按最后一段名称比较派生项，`Serialize` 与 `serde::Serialize` 视为同一项
fn derive_name(path: &Path) -> String {
    path.segments
        .last()
        .map(|s| s.ident.to_string())
        .unwrap_or_default()
}

/// 把 `required` 与已有的 `#[derive]` 合并为一条，其余属性保持原序
pub(crate) fn merge_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let mut derives = required;
    let mut others = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("derive") {
            others.push(attr);
            continue;
        }
        match attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            Ok(list) => {
                for path in list {
                    let name = derive_name(&path);
                    if !derives.iter().any(|d| derive_name(d) == name) {
                        derives.push(path);
                    }
                }
            }
            Err(_) => others.push(attr),
        }
    }

    attrs.push(syn::parse_quote!(#[derive(#(#derives),*)]));
    attrs.extend(others);
}

/// 让结构体以 `leading` 中的字段开头
///
/// 用户已声明的同名字段连同类型与属性原样保留，只调整位置；未声明的用模板补齐。
pub(crate) fn ensure_leading_fields<const N: usize>(fields: &mut FieldsNamed, leading: [Field; N]) {
    let mut rest: Vec<Field> = std::mem::take(&mut fields.named).into_iter().collect();
    let mut ordered = Vec::with_capacity(N + rest.len());

    for template in leading {
        match rest.iter().position(|f| f.ident == template.ident) {
            Some(i) => ordered.push(rest.remove(i)),
            None => ordered.push(template),
        }
    }
    ordered.extend(rest);

    fields.named = ordered.into_iter().collect();
}
