//! 订单（Bestellung）
//!
use acme_domain::entity::Entity;
use acme_domain::patch::{PatchError, PatchOp, Patchable, parse_value};
use acme_domain::specification::{Specification, spec};
use acme_domain::validation::{Validate, Validator};
use acme_macros::{entity, entity_id};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[entity_id(copy = true, generate = uuid::Uuid::new_v4)]
pub struct BestellungId(uuid::Uuid);

impl BestellungId {
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

/// 客户服务中的客户标识
#[entity_id(copy = true)]
pub struct KundeId(uuid::Uuid);

impl KundeId {
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 订单
///
/// `kundeNachname` 只在读取时由客户服务填充，从不写入存储，也不从请求体读取。
#[entity(id = BestellungId)]
#[derive(PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Bestellung {
    #[serde(default = "today")]
    pub datum: NaiveDate,
    pub kunde_id: KundeId,
    pub bestellpositionen: Vec<Bestellposition>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub kunde_nachname: Option<String>,
}

fn eins() -> i32 {
    1
}

/// 订单项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bestellposition {
    pub artikel_id: uuid::Uuid,
    pub einzelpreis: Decimal,
    #[serde(default = "eins")]
    pub anzahl: i32,
}

impl Bestellposition {
    pub fn new(artikel_id: uuid::Uuid, einzelpreis: Decimal, anzahl: i32) -> Self {
        Self {
            artikel_id,
            einzelpreis,
            anzahl,
        }
    }
}

impl Validate for Bestellung {
    fn validate_into(&self, v: &mut Validator) {
        v.check("kundeId", !self.kunde_id.is_nil(), "must not be null")
            .not_empty("bestellpositionen", &self.bestellpositionen)
            .each("bestellpositionen", &self.bestellpositionen);
    }
}

impl Validate for Bestellposition {
    fn validate_into(&self, v: &mut Validator) {
        v.positive("einzelpreis", self.einzelpreis, Decimal::ZERO)
            .min("anzahl", self.anzahl, 1);
    }
}

impl Patchable for Bestellung {
    fn replace(&mut self, path: &str, value: &str) -> Result<(), PatchError> {
        match path {
            "/datum" => self.datum = parse_value(path, value)?,
            "/kundeId" => self.kunde_id = parse_value(path, value)?,
            _ => return Err(PatchError::unsupported(&PatchOp::Replace, path)),
        }
        Ok(())
    }
}

pub fn by_id(id: BestellungId) -> Box<dyn Specification<Bestellung>> {
    spec(move |b: &Bestellung| b.id() == &id)
}

pub fn by_kunde_id(kunde_id: KundeId) -> Box<dyn Specification<Bestellung>> {
    spec(move |b: &Bestellung| b.kunde_id == kunde_id)
}
