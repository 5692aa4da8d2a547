//! 客户（Kunde）
//!
use std::collections::BTreeSet;
use std::sync::LazyLock;

use acme_domain::patch::{
    PatchError, PatchOp, Patchable, add_to_set, parse_optional, parse_value, remove_from_set,
};
use acme_domain::validation::{Validate, Validator};
use acme_macros::{entity, entity_id, value_object};
use chrono::{NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use url::Url;

use super::enums::{Familienstand, Geschlecht, Interesse};

#[entity_id(copy = true, generate = uuid::Uuid::new_v4)]
pub struct KundeId(uuid::Uuid);

impl KundeId {
    /// 是否为未赋值的标识（全零）
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

/// 客户
///
/// `id` 与 `version` 不出现在 JSON 中：前者由链接承载，后者由 `ETag` 承载。
/// 缺失的字段取默认值，随后由校验报告。
#[entity(id = KundeId)]
#[derive(PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Kunde {
    pub nachname: String,
    pub email: String,
    pub kategorie: i32,
    pub newsletter: bool,
    pub geburtsdatum: Option<NaiveDate>,
    pub umsatz: Option<Umsatz>,
    pub homepage: Option<Url>,
    pub geschlecht: Option<Geschlecht>,
    pub familienstand: Option<Familienstand>,
    pub interessen: BTreeSet<Interesse>,
    pub adresse: Adresse,
    /// 账户名，用于访问控制
    pub username: Option<String>,
}

#[value_object]
#[serde(default)]
pub struct Adresse {
    pub plz: String,
    pub ort: String,
}

impl Adresse {
    pub fn new(plz: impl Into<String>, ort: impl Into<String>) -> Self {
        Self {
            plz: plz.into(),
            ort: ort.into(),
        }
    }
}

/// 累计销售额
#[value_object]
pub struct Umsatz {
    pub betrag: Decimal,
    /// ISO 4217 货币代码
    pub waehrung: String,
}

impl Umsatz {
    pub fn new(betrag: Decimal, waehrung: impl Into<String>) -> Self {
        Self {
            betrag,
            waehrung: waehrung.into(),
        }
    }
}

static NACHNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(o'|von|von der|von und zu|van)?[A-ZÄÖÜ][a-zäöüß]+(-[A-ZÄÖÜ][a-zäöüß]+)?$")
        .expect("Invalid nachname regex pattern")
});

static PLZ_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("Invalid plz regex pattern"));

static WAEHRUNG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid waehrung regex pattern"));

pub const MIN_KATEGORIE: i32 = 0;
pub const MAX_KATEGORIE: i32 = 9;

impl Validate for Kunde {
    fn validate_into(&self, v: &mut Validator) {
        v.pattern("nachname", &self.nachname, &NACHNAME_PATTERN)
            .email("email", &self.email)
            .range("kategorie", self.kategorie, MIN_KATEGORIE, MAX_KATEGORIE)
            .nested("adresse", &self.adresse);

        if let Some(geburtsdatum) = self.geburtsdatum {
            v.past_date("geburtsdatum", geburtsdatum, Utc::now().date_naive());
        }
        if let Some(umsatz) = &self.umsatz {
            v.nested("umsatz", umsatz);
        }
    }
}

impl Validate for Adresse {
    fn validate_into(&self, v: &mut Validator) {
        v.pattern("plz", &self.plz, &PLZ_PATTERN)
            .not_blank("ort", &self.ort);
    }
}

impl Validate for Umsatz {
    fn validate_into(&self, v: &mut Validator) {
        v.min("betrag", self.betrag, Decimal::ZERO)
            .pattern("waehrung", &self.waehrung, &WAEHRUNG_PATTERN);
    }
}

impl Patchable for Kunde {
    fn replace(&mut self, path: &str, value: &str) -> Result<(), PatchError> {
        match path {
            "/nachname" => self.nachname = value.to_string(),
            "/email" => self.email = value.to_string(),
            "/kategorie" => self.kategorie = parse_value(path, value)?,
            "/newsletter" => self.newsletter = parse_value(path, value)?,
            "/geburtsdatum" => self.geburtsdatum = parse_optional(path, value)?,
            "/homepage" => self.homepage = parse_optional(path, value)?,
            "/adresse/plz" => self.adresse.plz = value.to_string(),
            "/adresse/ort" => self.adresse.ort = value.to_string(),
            _ => return Err(PatchError::unsupported(&PatchOp::Replace, path)),
        }
        Ok(())
    }

    fn add(&mut self, path: &str, value: &str) -> Result<(), PatchError> {
        match path {
            "/interessen" => add_to_set(&mut self.interessen, path, value),
            _ => Err(PatchError::unsupported(&PatchOp::Add, path)),
        }
    }

    fn remove(&mut self, path: &str, value: &str) -> Result<(), PatchError> {
        match path {
            "/interessen" => remove_from_set(&mut self.interessen, path, value),
            _ => Err(PatchError::unsupported(&PatchOp::Remove, path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acme_domain::entity::Entity;
    use acme_domain::patch::{PatchOperation, apply_patch};
    use acme_domain::value_object::Version;
    use serde_json::json;

    fn alpha() -> Kunde {
        serde_json::from_value(json!({
            "nachname": "Alpha",
            "email": "alpha@acme.de",
            "kategorie": 1,
            "newsletter": true,
            "geburtsdatum": "2019-01-01",
            "umsatz": {"betrag": "10", "waehrung": "EUR"},
            "homepage": "https://www.acme.de",
            "geschlecht": "M",
            "familienstand": "L",
            "interessen": ["S", "L"],
            "adresse": {"plz": "12345", "ort": "Testort"},
            "username": "alpha",
        }))
        .unwrap()
    }

    fn properties(k: &Kunde) -> Vec<String> {
        k.validate().into_iter().map(|v| v.property).collect()
    }

    #[test]
    fn valid_kunde() {
        let k = alpha();
        assert!(k.validate().is_empty());
        assert!(k.id().is_nil());
        assert!(k.version().is_new());
        assert_eq!(k.interessen.len(), 2);
    }

    #[test]
    fn reports_every_violation() {
        let mut k = alpha();
        k.nachname = "alpha".into();
        k.email = "keine-email".into();
        k.kategorie = 10;
        k.geburtsdatum = Some(Utc::now().date_naive());
        k.umsatz = Some(Umsatz::new(Decimal::NEGATIVE_ONE, "eur"));
        k.adresse = Adresse::new("1234", " ");

        assert_eq!(
            properties(&k),
            vec![
                "adresse.ort",
                "adresse.plz",
                "email",
                "geburtsdatum",
                "kategorie",
                "nachname",
                "umsatz.betrag",
                "umsatz.waehrung",
            ]
        );
    }

    #[test]
    fn nachname_pattern() {
        let mut k = alpha();
        for ok in ["Müller", "Meier-Schulze", "vonGoethe", "o'Neill"] {
            k.nachname = ok.into();
            assert!(k.validate().is_empty(), "{ok}");
        }
        for bad in ["", "müller", "Meier-", "X"] {
            k.nachname = bad.into();
            assert_eq!(properties(&k), vec!["nachname"], "{bad}");
        }
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let k: Kunde = serde_json::from_value(json!({"nachname": "Alpha"})).unwrap();
        assert!(k.email.is_empty());
        assert!(!k.newsletter);
        assert!(properties(&k).contains(&"email".to_string()));
    }

    #[test]
    fn json_has_no_id_or_version() {
        let mut k = alpha();
        k.set_version(Version::from_value(3));
        let value = serde_json::to_value(&k).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("version").is_none());
        assert_eq!(value["adresse"]["plz"], "12345");
        assert_eq!(value["interessen"], json!(["S", "L"]));
    }

    #[test]
    fn patch_paths() {
        let k = alpha();
        let ops = vec![
            PatchOperation::replace("/nachname", "Beta"),
            PatchOperation::replace("/kategorie", "5"),
            PatchOperation::replace("/newsletter", "false"),
            PatchOperation::replace("/geburtsdatum", ""),
            PatchOperation::replace("/adresse/ort", "Neustadt"),
            PatchOperation::add("/interessen", "R"),
            PatchOperation::remove("/interessen", "S"),
        ];
        let patched = apply_patch(&k, &ops).unwrap();
        assert_eq!(patched.nachname, "Beta");
        assert_eq!(patched.kategorie, 5);
        assert!(!patched.newsletter);
        assert_eq!(patched.geburtsdatum, None);
        assert_eq!(patched.adresse.ort, "Neustadt");
        assert_eq!(
            patched.interessen.iter().copied().collect::<Vec<_>>(),
            vec![Interesse::Lesen, Interesse::Reisen]
        );
    }

    #[test]
    fn patch_rejects_unknown_paths_and_values() {
        let k = alpha();
        assert!(matches!(
            apply_patch(&k, &[PatchOperation::replace("/username", "x")]),
            Err(PatchError::UnsupportedPath { .. })
        ));
        assert!(matches!(
            apply_patch(&k, &[PatchOperation::add("/nachname", "x")]),
            Err(PatchError::UnsupportedPath { .. })
        ));
        assert!(matches!(
            apply_patch(&k, &[PatchOperation::replace("/kategorie", "viel")]),
            Err(PatchError::InvalidValue { .. })
        ));
        assert!(matches!(
            apply_patch(&k, &[PatchOperation::add("/interessen", "X")]),
            Err(PatchError::InvalidValue { .. })
        ));
    }
}
