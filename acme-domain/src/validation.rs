//! 校验引擎（Validation Engine）
//!
//! 针对实体运行声明式的字段/对象约束，返回全部约束违反（不短路）。
//! 属性路径以点号连接，例如 `adresse.plz`、`bestellpositionen[0].anzahl`。
//!
use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 单条约束违反
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub property: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}

/// 约束违反集合（有序，便于稳定输出）
pub type Violations = BTreeSet<ConstraintViolation>;

/// 可被校验的对象
pub trait Validate {
    /// 将本对象的约束写入收集器
    fn validate_into(&self, v: &mut Validator);

    /// 运行全部约束；为空表示通过
    fn validate(&self) -> Violations {
        let mut v = Validator::new();
        self.validate_into(&mut v);
        v.finish()
    }
}

/// 约束收集器
///
/// 每个方法只登记违反，从不提前返回。
///
/// ```
/// use acme_domain::validation::Validator;
///
/// let mut v = Validator::new();
/// v.range("kategorie", 12, 0, 9).not_blank("nachname", " ");
/// let violations = v.finish();
/// assert_eq!(violations.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    prefix: Option<String>,
    violations: Violations,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_prefix(prefix: String) -> Self {
        Self {
            prefix: Some(prefix),
            violations: Violations::new(),
        }
    }

    fn path(&self, property: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{property}"),
            None => property.to_string(),
        }
    }

    /// 登记一条违反
    pub fn violation(&mut self, property: &str, message: impl Into<String>) -> &mut Self {
        let property = self.path(property);
        self.violations
            .insert(ConstraintViolation::new(property, message));
        self
    }

    /// 条件不成立时登记违反
    pub fn check(&mut self, property: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.violation(property, message);
        }
        self
    }

    pub fn required<T>(&mut self, property: &str, value: Option<&T>) -> &mut Self {
        self.check(property, value.is_some(), "must not be null")
    }

    pub fn not_blank(&mut self, property: &str, value: &str) -> &mut Self {
        self.check(property, !value.trim().is_empty(), "must not be blank")
    }

    pub fn pattern(&mut self, property: &str, value: &str, re: &Regex) -> &mut Self {
        let ok = re.is_match(value);
        self.check(property, ok, format!("must match \"{}\"", re.as_str()))
    }

    pub fn email(&mut self, property: &str, value: &str) -> &mut Self {
        let ok = email_regex().is_match(value);
        self.check(property, ok, "must be a well-formed email address")
    }

    pub fn range<T>(&mut self, property: &str, value: T, min: T, max: T) -> &mut Self
    where
        T: PartialOrd + Display,
    {
        let ok = value >= min && value <= max;
        self.check(property, ok, format!("must be between {min} and {max}"))
    }

    pub fn min<T>(&mut self, property: &str, value: T, min: T) -> &mut Self
    where
        T: PartialOrd + Display,
    {
        let ok = value >= min;
        self.check(
            property,
            ok,
            format!("must be greater than or equal to {min}"),
        )
    }

    /// 严格大于零
    pub fn positive<T>(&mut self, property: &str, value: T, zero: T) -> &mut Self
    where
        T: PartialOrd,
    {
        self.check(property, value > zero, "must be greater than 0")
    }

    pub fn length(&mut self, property: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        self.check(
            property,
            len >= min && len <= max,
            format!("size must be between {min} and {max}"),
        )
    }

    pub fn not_empty<T>(&mut self, property: &str, items: &[T]) -> &mut Self {
        self.check(property, !items.is_empty(), "must not be empty")
    }

    pub fn past_date(&mut self, property: &str, date: NaiveDate, today: NaiveDate) -> &mut Self {
        self.check(property, date < today, "must be a past date")
    }

    /// 校验嵌套对象，属性路径为 `property.<child>`
    pub fn nested<T: Validate>(&mut self, property: &str, value: &T) -> &mut Self {
        let mut child = Validator::with_prefix(self.path(property));
        value.validate_into(&mut child);
        self.violations.extend(child.violations);
        self
    }

    /// 校验列表中的每个元素，属性路径为 `property[i].<child>`
    pub fn each<T: Validate>(&mut self, property: &str, items: &[T]) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            let mut child = Validator::with_prefix(format!("{}[{i}]", self.path(property)));
            item.validate_into(&mut child);
            self.violations.extend(child.violations);
        }
        self
    }

    pub fn finish(self) -> Violations {
        self.violations
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex pattern")
});

fn email_regex() -> &'static Regex {
    &EMAIL_PATTERN
}
