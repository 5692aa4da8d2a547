use acme_application::query::Query;
use acme_application::result::FindByIdResult;

use crate::domain::{Bestellung, BestellungId, KundeId};

#[derive(Debug, Clone)]
pub struct FindBestellungById {
    pub id: BestellungId,
}

impl Query for FindBestellungById {
    const NAME: &'static str = "FindBestellungById";
    type Output = FindByIdResult<Bestellung>;
}

/// 全部订单，或某个客户的订单
#[derive(Debug, Clone, Default)]
pub struct FindBestellungen {
    pub kunde_id: Option<KundeId>,
}

impl Query for FindBestellungen {
    const NAME: &'static str = "FindBestellungen";
    type Output = Vec<Bestellung>;
}
