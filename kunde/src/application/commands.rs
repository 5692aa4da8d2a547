use acme_application::command::Command;
use acme_application::result::{CreateResult, UpdateResult};
use acme_domain::patch::PatchOperation;

use crate::domain::{Kunde, KundeId};

#[derive(Debug, Clone)]
pub struct CreateKunde {
    pub kunde: Kunde,
}

impl Command for CreateKunde {
    const NAME: &'static str = "CreateKunde";
    type Output = CreateResult<Kunde>;
}

/// 以完整实体替换；`version` 为 `If-Match` 原文
#[derive(Debug, Clone)]
pub struct UpdateKunde {
    pub id: KundeId,
    pub kunde: Kunde,
    pub version: String,
}

impl Command for UpdateKunde {
    const NAME: &'static str = "UpdateKunde";
    type Output = UpdateResult<Kunde>;
}

#[derive(Debug, Clone)]
pub struct PatchKunde {
    pub id: KundeId,
    pub operations: Vec<PatchOperation>,
    pub version: String,
}

impl Command for PatchKunde {
    const NAME: &'static str = "PatchKunde";
    type Output = UpdateResult<Kunde>;
}

/// 输出为删除数量
#[derive(Debug, Clone)]
pub struct DeleteKunde {
    pub id: KundeId,
}

impl Command for DeleteKunde {
    const NAME: &'static str = "DeleteKunde";
    type Output = usize;
}

#[derive(Debug, Clone)]
pub struct DeleteKundeByEmail {
    pub email: String,
}

impl Command for DeleteKundeByEmail {
    const NAME: &'static str = "DeleteKundeByEmail";
    type Output = usize;
}
