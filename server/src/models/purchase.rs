use std::fmt;

use serde::{Deserialize, Serialize};

/// Purchase body as received. Every field is optional so a missing value
/// surfaces as a validation issue instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseForm {
    #[serde(alias = "concertId")]
    pub event_id: Option<i64>,
    pub email: Option<String>,
    #[serde(alias = "name")]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub quantity: Option<i64>,
    #[serde(alias = "creditCard")]
    pub card_number: Option<String>,
    #[serde(alias = "expiration")]
    pub expiry: Option<String>,
    pub security_code: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    #[serde(alias = "postalCode")]
    pub postal: Option<String>,
    pub country: Option<String>,
}

/// A purchase that passed validation. This is the queue message payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub event_id: u32,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub quantity: u8,
    pub card_number: String,
    pub expiry: String,
    pub security_code: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal: String,
    pub country: String,
}

impl fmt::Debug for PurchaseRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurchaseRequest")
            .field("event_id", &self.event_id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .field("quantity", &self.quantity)
            .field("card_number", &mask(&self.card_number, 4))
            .field("expiry", &self.expiry)
            .field("security_code", &mask(&self.security_code, 0))
            .field("address", &self.address)
            .field("city", &self.city)
            .field("province", &self.province)
            .field("postal", &self.postal)
            .field("country", &self.country)
            .finish()
    }
}

/// Replaces all but the last `visible` characters with `*`.
fn mask(value: &str, visible: usize) -> String {
    let len = value.chars().count();
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i + visible < len { '*' } else { c })
        .collect()
}
