//! 实体（Entity）基础抽象
//!
//! 统一的标识（Id）与版本（乐观锁）能力。版本号只由仓储写入，
//! 实体自身不会递增版本。
//!
use std::{
    fmt::{Debug, Display},
    hash::Hash,
    str::FromStr,
};

use crate::value_object::Version;

/// 具备唯一标识与版本的实体抽象
pub trait Entity: Clone + Send + Sync + 'static {
    /// 实体标识类型，要求可解析、可显示、可比较与可哈希
    type Id: FromStr + Clone + Debug + Display + Eq + Hash + Send + Sync + 'static;

    /// 使用给定标识与版本创建实体，其余字段取默认值
    fn new(id: Self::Id, version: Version) -> Self;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;

    /// 获取当前版本
    fn version(&self) -> Version;

    fn set_id(&mut self, id: Self::Id);

    fn set_version(&mut self, version: Version);
}
