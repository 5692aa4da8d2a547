//! 开发环境的测试数据
//!
use std::collections::BTreeSet;

use acme_domain::entity::Entity;
use acme_domain::error::DomainResult;
use acme_domain::persist::Repository;
use acme_domain::value_object::Version;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use url::Url;

use crate::domain::{Adresse, Familienstand, Geschlecht, Interesse, Kunde, KundeId, Umsatz};

struct Seed {
    nachname: &'static str,
    email: &'static str,
    kategorie: i32,
    tag: u32,
    umsatz: Option<(i64, &'static str)>,
    homepage: &'static str,
    geschlecht: Geschlecht,
    familienstand: Familienstand,
    interessen: &'static [Interesse],
    plz: &'static str,
    ort: &'static str,
    username: &'static str,
}

const SEEDS: [Seed; 7] = [
    Seed {
        nachname: "Admin",
        email: "admin@acme.de",
        kategorie: 0,
        tag: 31,
        umsatz: Some((0, "EUR")),
        homepage: "https://www.acme.de",
        geschlecht: Geschlecht::Weiblich,
        familienstand: Familienstand::Verheiratet,
        interessen: &[Interesse::Lesen],
        plz: "00000",
        ort: "Aachen",
        username: "admin",
    },
    Seed {
        nachname: "Alpha",
        email: "alpha@acme.edu",
        kategorie: 1,
        tag: 1,
        umsatz: Some((10, "USD")),
        homepage: "https://www.acme.edu",
        geschlecht: Geschlecht::Maennlich,
        familienstand: Familienstand::Ledig,
        interessen: &[Interesse::Sport, Interesse::Lesen],
        plz: "11111",
        ort: "Augsburg",
        username: "alpha1",
    },
    Seed {
        nachname: "Alpha",
        email: "alpha@acme.ch",
        kategorie: 2,
        tag: 2,
        umsatz: Some((20, "CHF")),
        homepage: "https://www.acme.ch",
        geschlecht: Geschlecht::Weiblich,
        familienstand: Familienstand::Geschieden,
        interessen: &[Interesse::Sport, Interesse::Reisen],
        plz: "22222",
        ort: "Aalen",
        username: "alpha2",
    },
    Seed {
        nachname: "Alpha",
        email: "alpha@acme.uk",
        kategorie: 3,
        tag: 3,
        umsatz: Some((30, "GBP")),
        homepage: "https://www.acme.uk",
        geschlecht: Geschlecht::Maennlich,
        familienstand: Familienstand::Verwitwet,
        interessen: &[Interesse::Lesen, Interesse::Reisen],
        plz: "33333",
        ort: "Ahlen",
        username: "alpha3",
    },
    Seed {
        nachname: "Delta",
        email: "delta@acme.jp",
        kategorie: 4,
        tag: 4,
        umsatz: Some((40, "JPY")),
        homepage: "https://www.acme.jp",
        geschlecht: Geschlecht::Weiblich,
        familienstand: Familienstand::Verheiratet,
        interessen: &[],
        plz: "44444",
        ort: "Dortmund",
        username: "delta",
    },
    Seed {
        nachname: "Epsilon",
        email: "epsilon@acme.cn",
        kategorie: 5,
        tag: 5,
        umsatz: None,
        homepage: "https://www.acme.cn",
        geschlecht: Geschlecht::Maennlich,
        familienstand: Familienstand::Ledig,
        interessen: &[],
        plz: "55555",
        ort: "Essen",
        username: "epsilon",
    },
    Seed {
        nachname: "Phi",
        email: "phi@acme.cn",
        kategorie: 6,
        tag: 6,
        umsatz: None,
        homepage: "https://www.acme.cn",
        geschlecht: Geschlecht::Maennlich,
        familienstand: Familienstand::Ledig,
        interessen: &[],
        plz: "66666",
        ort: "Freiburg",
        username: "phi",
    },
];

/// 第 `n` 个测试客户的标识：`00000000-0000-0000-0000-00000000000n`
pub fn kunde_id(n: u128) -> KundeId {
    KundeId::new(uuid::Uuid::from_u128(n))
}

fn build(n: usize, seed: &Seed) -> Kunde {
    let mut kunde = Kunde::new(kunde_id(n as u128), Version::new());
    kunde.nachname = seed.nachname.to_string();
    kunde.email = seed.email.to_string();
    kunde.kategorie = seed.kategorie;
    kunde.newsletter = true;
    kunde.geburtsdatum = NaiveDate::from_ymd_opt(2019, 1, seed.tag);
    kunde.umsatz = seed
        .umsatz
        .map(|(betrag, waehrung)| Umsatz::new(Decimal::from(betrag), waehrung));
    kunde.homepage = Url::parse(seed.homepage).ok();
    kunde.geschlecht = Some(seed.geschlecht);
    kunde.familienstand = Some(seed.familienstand);
    kunde.interessen = seed.interessen.iter().copied().collect::<BTreeSet<_>>();
    kunde.adresse = Adresse::new(seed.plz, seed.ort);
    kunde.username = Some(seed.username.to_string());
    kunde
}

/// 全部测试客户（版本 0）
pub fn kunden() -> Vec<Kunde> {
    SEEDS
        .iter()
        .enumerate()
        .map(|(n, seed)| build(n, seed))
        .collect()
}

/// 写入测试数据；存储须为空
pub async fn populate(repo: &dyn Repository<Kunde>) -> DomainResult<usize> {
    tracing::warn!("populating kunde store with test data");
    let mut count = 0;
    for kunde in kunden() {
        let inserted = repo.insert(kunde).await?;
        tracing::debug!(id = %inserted.id(), nachname = %inserted.nachname, "inserted");
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acme_domain::validation::Validate;

    #[test]
    fn seeds_are_valid() {
        for kunde in kunden() {
            assert!(kunde.validate().is_empty(), "{}: {:?}", kunde.email, kunde.validate());
        }
    }

    #[tokio::test]
    async fn populates_seven_kunden() {
        let repo = crate::application::repository();
        assert_eq!(populate(&repo).await.unwrap(), 7);

        let alpha1 = repo.find_by_id(&kunde_id(1)).await.unwrap().unwrap();
        assert_eq!(alpha1.username.as_deref(), Some("alpha1"));
        assert_eq!(alpha1.id().to_string(), "00000000-0000-0000-0000-000000000001");
        assert!(alpha1.version().is_new());
    }
}
