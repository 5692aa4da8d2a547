use acme_application::command::Command;
use acme_application::result::{CreateResult, UpdateResult};
use acme_domain::patch::PatchOperation;

use crate::domain::{Bestellung, BestellungId};

#[derive(Debug, Clone)]
pub struct CreateBestellung {
    pub bestellung: Bestellung,
}

impl Command for CreateBestellung {
    const NAME: &'static str = "CreateBestellung";
    type Output = CreateResult<Bestellung>;
}

#[derive(Debug, Clone)]
pub struct UpdateBestellung {
    pub id: BestellungId,
    pub bestellung: Bestellung,
    pub version: String,
}

impl Command for UpdateBestellung {
    const NAME: &'static str = "UpdateBestellung";
    type Output = UpdateResult<Bestellung>;
}

#[derive(Debug, Clone)]
pub struct PatchBestellung {
    pub id: BestellungId,
    pub operations: Vec<PatchOperation>,
    pub version: String,
}

impl Command for PatchBestellung {
    const NAME: &'static str = "PatchBestellung";
    type Output = UpdateResult<Bestellung>;
}

#[derive(Debug, Clone)]
pub struct DeleteBestellung {
    pub id: BestellungId,
}

impl Command for DeleteBestellung {
    const NAME: &'static str = "DeleteBestellung";
    type Output = usize;
}
