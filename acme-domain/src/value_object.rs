//! 值对象
//!
use std::fmt;

use acme_macros::value_object;

/// 实体版本号
///
/// 插入时为 0，每次成功的条件写入后加一。HTTP 层以强 ETag（`"3"`）
/// 传递，JSON 中序列化为裸数字。
///
/// ```
/// use acme_domain::value_object::Version;
///
/// let v = Version::new();
/// assert!(v.is_new());
/// assert_eq!(v.next().etag(), "\"1\"");
/// ```
#[value_object]
#[derive(Copy, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_value(value: usize) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> usize {
        self.0
    }

    pub const fn is_new(&self) -> bool {
        self.0 == 0
    }

    /// 写入成功后的版本
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// 带双引号的强 ETag
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<usize> for Version {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_increments() {
        let v = Version::default();
        assert_eq!(v, Version::new());
        assert_eq!(v.next().next(), Version::from(2));
        assert!(!v.next().is_new());
    }

    #[test]
    fn etag_and_display() {
        let v = Version::from_value(42);
        assert_eq!(v.etag(), "\"42\"");
        assert_eq!(v.to_string(), "v42");
    }

    #[test]
    fn json_is_a_bare_number() {
        let v = Version::from_value(3);
        assert_eq!(serde_json::to_string(&v).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Version>("3").unwrap(), v);
    }
}
