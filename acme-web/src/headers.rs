//! 条件请求头部
//!
//! 版本号以带引号的 `ETag` 表示，例如 `"3"`。
//!
use acme_domain::value_object::Version;
use axum::http::header::{ETAG, IF_MATCH, IF_NONE_MATCH};
use axum::http::{HeaderMap, HeaderName};

fn first<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get_all(name)
        .iter()
        .find_map(|v| v.to_str().ok())
        .map(str::trim)
}

/// `If-Match` 的原文（含引号）
pub fn if_match(headers: &HeaderMap) -> Option<&str> {
    first(headers, &IF_MATCH)
}

pub fn if_none_match(headers: &HeaderMap) -> Option<&str> {
    first(headers, &IF_NONE_MATCH)
}

/// `If-None-Match` 与当前版本一致时返回 `true`（应答 304）
pub fn not_modified(headers: &HeaderMap, current: Version) -> bool {
    if_none_match(headers).is_some_and(|tag| tag == current.etag())
}

/// 作为响应部件使用的 `ETag`
pub fn etag(version: Version) -> [(HeaderName, String); 1] {
    [(ETAG, version.etag())]
}
