//! 规约（Specification）
//!
//! 仓储的查找、存在性检查与删除都以规约为条件。查询参数逐项转换为规约后
//! 用 `AllSpecification` 合取。
//!
use std::marker::PhantomData;

pub trait Specification<T>: Send + Sync {
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    fn and<S>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        And(self, other)
    }
}

impl<T> Specification<T> for Box<dyn Specification<T>> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (**self).is_satisfied_by(candidate)
    }
}

pub struct And<A, B>(A, B);

impl<T, A: Specification<T>, B: Specification<T>> Specification<T> for And<A, B> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) && self.1.is_satisfied_by(candidate)
    }
}

/// 闭包规约
pub struct Predicate<T, F> {
    f: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> Specification<T> for Predicate<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.f)(candidate)
    }
}

/// 以闭包构造装箱的规约
pub fn spec<T, F>(f: F) -> Box<dyn Specification<T>>
where
    T: 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Box::new(Predicate {
        f,
        _marker: PhantomData,
    })
}

/// 恒真
pub struct AnySpecification;

impl<T> Specification<T> for AnySpecification {
    fn is_satisfied_by(&self, _: &T) -> bool {
        true
    }
}

/// 恒假，用于无法识别的查询条件
pub struct NoneSpecification;

impl<T> Specification<T> for NoneSpecification {
    fn is_satisfied_by(&self, _: &T) -> bool {
        false
    }
}

/// 合取；为空时恒真
pub struct AllSpecification<T> {
    specs: Vec<Box<dyn Specification<T>>>,
}

impl<T> AllSpecification<T> {
    pub fn push(&mut self, spec: Box<dyn Specification<T>>) {
        self.specs.push(spec);
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<T> Default for AllSpecification<T> {
    fn default() -> Self {
        Self { specs: Vec::new() }
    }
}

impl<T> FromIterator<Box<dyn Specification<T>>> for AllSpecification<T> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Specification<T>>>>(iter: I) -> Self {
        Self {
            specs: iter.into_iter().collect(),
        }
    }
}

impl<T> Specification<T> for AllSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.specs.iter().all(|s| s.is_satisfied_by(candidate))
    }
}
