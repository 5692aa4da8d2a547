//! 开发环境的测试数据
//!
use acme_domain::entity::Entity;
use acme_domain::error::DomainResult;
use acme_domain::persist::Repository;
use acme_domain::value_object::Version;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Bestellposition, Bestellung, BestellungId, KundeId};

/// `10000000-0000-0000-0000-00000000000n`
pub fn bestellung_id(n: u128) -> BestellungId {
    BestellungId::new(Uuid::from_u128((1 << 124) + n))
}

/// `00000000-0000-0000-0000-00000000000n`，与客户服务的测试数据一致
pub fn kunde_id(n: u128) -> KundeId {
    KundeId::new(Uuid::from_u128(n))
}

fn artikel_id(n: u128) -> Uuid {
    Uuid::from_u128((2 << 124) + n)
}

// (序号, 日, 客户, [(商品, 单价, 数量)])
type Seed = (u128, u32, u128, &'static [(u128, i64, i32)]);

const SEEDS: [Seed; 5] = [
    (1, 1, 1, &[(1, 10, 1), (2, 20, 1)]),
    (2, 2, 1, &[(3, 30, 3), (4, 40, 4)]),
    (3, 3, 1, &[(5, 50, 5), (6, 60, 6)]),
    (4, 4, 2, &[(1, 10, 1)]),
    (5, 5, 4, &[(1, 10, 1)]),
];

/// 全部测试订单（版本 0）
pub fn bestellungen() -> Vec<Bestellung> {
    SEEDS
        .iter()
        .map(|&(n, tag, kunde, positionen)| {
            let mut b = Bestellung::new(bestellung_id(n), Version::new());
            b.datum = NaiveDate::from_ymd_opt(2019, 1, tag).unwrap_or_default();
            b.kunde_id = kunde_id(kunde);
            b.bestellpositionen = positionen
                .iter()
                .map(|&(artikel, preis, anzahl)| {
                    Bestellposition::new(artikel_id(artikel), Decimal::from(preis), anzahl)
                })
                .collect();
            b
        })
        .collect()
}

/// 写入测试数据；存储须为空
pub async fn populate(repo: &dyn Repository<Bestellung>) -> DomainResult<usize> {
    tracing::warn!("populating bestellung store with test data");
    let mut count = 0;
    for bestellung in bestellungen() {
        let inserted = repo.insert(bestellung).await?;
        tracing::debug!(id = %inserted.id(), kunde_id = %inserted.kunde_id, "inserted");
        count += 1;
    }
    Ok(count)
}
