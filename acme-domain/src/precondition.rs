//! 冲突检测（Conflict Detector）
//!
//! 解析客户端通过 `If-Match` 提交的版本号。只做语法层面的分类，
//! 与存储版本的比较发生在仓储的条件写入中。
//!
//! 头部缺失不在这里处理，接口层在读取请求体之前即以 428 拒绝。
//!
//! - 少于 3 个字符：视为格式错误，原样返回
//! - 其余情况去掉首尾字符（引号）后按非负整数解析，失败时返回去掉引号后的字符串
//!
use crate::value_object::Version;

/// 版本号检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// 无法解析的版本号，携带原始（或去引号后的）文本
    Malformed(String),
    /// 解析成功
    Parsed(Version),
}

/// 对 `If-Match` 头部的值进行分类
///
/// ```
/// use acme_domain::precondition::{VersionCheck, check_version};
/// use acme_domain::value_object::Version;
///
/// assert_eq!(check_version("\"7\""), VersionCheck::Parsed(Version::from_value(7)));
/// assert_eq!(check_version("x"), VersionCheck::Malformed("x".into()));
/// ```
pub fn check_version(token: &str) -> VersionCheck {
    let mut chars = token.chars();
    if token.chars().count() < 3 {
        return VersionCheck::Malformed(token.to_string());
    }
    chars.next();
    chars.next_back();
    let stripped = chars.as_str();

    match stripped.parse::<usize>() {
        Ok(n) => VersionCheck::Parsed(Version::from_value(n)),
        Err(_) => VersionCheck::Malformed(stripped.to_string()),
    }
}
