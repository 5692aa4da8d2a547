mod bestellung;

pub use bestellung::{Bestellposition, Bestellung, BestellungId, KundeId, by_id, by_kunde_id};
