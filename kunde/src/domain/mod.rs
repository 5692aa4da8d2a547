mod enums;
mod filter;
mod kunde;

pub use enums::{Familienstand, Geschlecht, Interesse};
pub use filter::{by_email, by_id, by_username, email_prefix, kunde_filter, nachname_prefix};
pub use kunde::{Adresse, Kunde, KundeId, Umsatz};
