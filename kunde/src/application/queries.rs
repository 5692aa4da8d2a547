use acme_application::query::Query;
use acme_application::result::FindByIdResult;
use acme_domain::value_object::Version;

use crate::domain::{Kunde, KundeId};

/// 按标识读取，只有所有者或管理员可读
#[derive(Debug, Clone)]
pub struct FindKundeById {
    pub id: KundeId,
}

impl Query for FindKundeById {
    const NAME: &'static str = "FindKundeById";
    type Output = FindByIdResult<Kunde>;
}

/// 按查询参数过滤
#[derive(Debug, Clone, Default)]
pub struct FindKunden {
    pub params: Vec<(String, String)>,
}

impl Query for FindKunden {
    const NAME: &'static str = "FindKunden";
    type Output = Vec<Kunde>;
}

/// 去重、排序后的姓氏
#[derive(Debug, Clone)]
pub struct FindNachnamenByPrefix {
    pub prefix: String,
}

impl Query for FindNachnamenByPrefix {
    const NAME: &'static str = "FindNachnamenByPrefix";
    type Output = Vec<String>;
}

#[derive(Debug, Clone)]
pub struct FindEmailsByPrefix {
    pub prefix: String,
}

impl Query for FindEmailsByPrefix {
    const NAME: &'static str = "FindEmailsByPrefix";
    type Output = Vec<String>;
}

#[derive(Debug, Clone)]
pub struct FindVersionById {
    pub id: KundeId,
}

impl Query for FindVersionById {
    const NAME: &'static str = "FindVersionById";
    type Output = Option<Version>;
}
