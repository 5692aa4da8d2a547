//! 领域建模用的过程宏
//!
//! - `#[entity(id = IdType)]`：补齐 `id` / `version` 字段并实现 `acme_domain::entity::Entity`
//! - `#[entity_id(copy = bool, generate = path)]`：标识类型的常用实现
//! - `#[value_object(debug = bool, default = bool)]`：值对象的常用派生
//!
mod derives;
mod entity;
mod entity_id;
mod value_object;

use proc_macro::TokenStream;

#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
