//! 客户查询条件
//!
//! 所有条件以 AND 组合。未知的键或无法解析的取值使结果为空。
//!
use acme_domain::entity::Entity;
use acme_domain::specification::{AllSpecification, NoneSpecification, Specification, spec};
use rust_decimal::Decimal;

use super::enums::{Familienstand, Geschlecht, Interesse};
use super::kunde::{Kunde, KundeId};

/// 由查询参数构造规约；`interessen` 可重复出现，全部兴趣均须具备
pub fn kunde_filter(params: &[(String, String)]) -> Box<dyn Specification<Kunde>> {
    let mut all = AllSpecification::default();
    for (key, value) in params {
        match criterion(key, value) {
            Some(c) => all.push(c),
            None => {
                tracing::debug!(key = %key, value = %value, "unusable filter");
                return Box::new(NoneSpecification);
            }
        }
    }
    Box::new(all)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn criterion(key: &str, value: &str) -> Option<Box<dyn Specification<Kunde>>> {
    let c = match key {
        "nachname" => {
            let needle = value.to_lowercase();
            spec(move |k: &Kunde| contains_ignore_case(&k.nachname, &needle))
        }
        "email" => {
            let needle = value.to_lowercase();
            spec(move |k: &Kunde| contains_ignore_case(&k.email, &needle))
        }
        "kategorie" => {
            let kategorie: i32 = value.parse().ok()?;
            spec(move |k: &Kunde| k.kategorie == kategorie)
        }
        "plz" => {
            let prefix = value.to_string();
            spec(move |k: &Kunde| k.adresse.plz.starts_with(&prefix))
        }
        "ort" => {
            let needle = value.to_lowercase();
            spec(move |k: &Kunde| contains_ignore_case(&k.adresse.ort, &needle))
        }
        "umsatzmin" => {
            let min: Decimal = value.parse().ok()?;
            spec(move |k: &Kunde| k.umsatz.as_ref().is_some_and(|u| u.betrag >= min))
        }
        "geschlecht" => {
            let g: Geschlecht = value.parse().ok()?;
            spec(move |k: &Kunde| k.geschlecht == Some(g))
        }
        "familienstand" => {
            let f: Familienstand = value.parse().ok()?;
            spec(move |k: &Kunde| k.familienstand == Some(f))
        }
        "interessen" => {
            let i: Interesse = value.parse().ok()?;
            spec(move |k: &Kunde| k.interessen.contains(&i))
        }
        _ => return None,
    };
    Some(c)
}

pub fn by_id(id: KundeId) -> Box<dyn Specification<Kunde>> {
    spec(move |k: &Kunde| k.id() == &id)
}

pub fn by_email(email: &str) -> Box<dyn Specification<Kunde>> {
    let email = email.to_string();
    spec(move |k: &Kunde| k.email == email)
}

/// 属于账户 `username` 的客户；未知账户不匹配任何客户
pub fn by_username(username: Option<&str>) -> Box<dyn Specification<Kunde>> {
    match username {
        Some(name) => {
            let name = name.to_string();
            spec(move |k: &Kunde| k.username.as_deref() == Some(name.as_str()))
        }
        None => Box::new(NoneSpecification),
    }
}

/// 姓氏以 `prefix` 开头（不区分大小写）
pub fn nachname_prefix(prefix: &str) -> Box<dyn Specification<Kunde>> {
    let prefix = prefix.to_lowercase();
    spec(move |k: &Kunde| k.nachname.to_lowercase().starts_with(&prefix))
}

/// 邮箱以 `prefix` 开头（不区分大小写）
pub fn email_prefix(prefix: &str) -> Box<dyn Specification<Kunde>> {
    let prefix = prefix.to_lowercase();
    spec(move |k: &Kunde| k.email.to_lowercase().starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Adresse;
    use acme_domain::value_object::Version;
    use rust_decimal::Decimal;

    fn kunde(nachname: &str, email: &str, kategorie: i32, plz: &str) -> Kunde {
        let mut k = Kunde::new(KundeId::generate(), Version::new());
        k.nachname = nachname.into();
        k.email = email.into();
        k.kategorie = kategorie;
        k.adresse = Adresse::new(plz, "Aachen");
        k
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = kunde_filter(&[]);
        assert!(f.is_satisfied_by(&kunde("Alpha", "a@acme.de", 1, "11111")));
    }

    #[test]
    fn criteria_are_combined() {
        let alpha = kunde("Alpha", "alpha@acme.edu", 1, "11111");
        let delta = kunde("Delta", "delta@acme.jp", 4, "44444");

        let f = kunde_filter(&params(&[("nachname", "ALP"), ("plz", "111")]));
        assert!(f.is_satisfied_by(&alpha));
        assert!(!f.is_satisfied_by(&delta));

        let f = kunde_filter(&params(&[("email", "acme.jp"), ("kategorie", "4")]));
        assert!(f.is_satisfied_by(&delta));
        assert!(!f.is_satisfied_by(&alpha));
    }

    #[test]
    fn umsatz_geschlecht_and_interessen() {
        let mut k = kunde("Alpha", "alpha@acme.ch", 2, "22222");
        k.umsatz = Some(crate::domain::Umsatz::new(Decimal::from(20), "CHF"));
        k.geschlecht = Some(Geschlecht::Weiblich);
        k.interessen = [Interesse::Sport, Interesse::Reisen].into();

        assert!(kunde_filter(&params(&[("umsatzmin", "20")])).is_satisfied_by(&k));
        assert!(!kunde_filter(&params(&[("umsatzmin", "20.5")])).is_satisfied_by(&k));
        assert!(kunde_filter(&params(&[("geschlecht", "weiblich")])).is_satisfied_by(&k));
        assert!(
            kunde_filter(&params(&[("interessen", "S"), ("interessen", "R")]))
                .is_satisfied_by(&k)
        );
        assert!(
            !kunde_filter(&params(&[("interessen", "S"), ("interessen", "L")]))
                .is_satisfied_by(&k)
        );
    }

    #[test]
    fn unknown_keys_and_bad_values_match_nothing() {
        let k = kunde("Alpha", "alpha@acme.de", 1, "11111");
        assert!(!kunde_filter(&params(&[("farbe", "rot")])).is_satisfied_by(&k));
        assert!(!kunde_filter(&params(&[("kategorie", "eins")])).is_satisfied_by(&k));
        assert!(!kunde_filter(&params(&[("geschlecht", "X")])).is_satisfied_by(&k));
    }
}
