use serde::{Deserialize, Deserializer, Serialize};

use crate::db::Params;
use crate::models::amount::parse_amount;

/// A row of the `invoices` relation.
///
/// The endpoints only write this relation. This is the typed view for
/// reading it back through [`crate::db::Database::get_pool`].
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRecord {
    pub id: i64,
    pub invoice_number: String,
    pub product_name: String,
    pub total_amount: f64,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub discount: f64,
    pub seller_name: String,
    pub seller_phone: String,
    pub description: String,
}

/// Form body accepted by the invoice create and update endpoints.
///
/// Every field is optional: text defaults to empty, amounts default to zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InvoiceInput {
    pub invoice_number: String,
    pub product_name: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub total_amount: f64,
    pub buyer_name: String,
    pub buyer_phone: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub discount: f64,
    pub seller_name: String,
    pub seller_phone: String,
    pub description: String,
}

impl InvoiceInput {
    /// Named parameters for the nine invoice columns
    pub fn params(&self) -> Params {
        Params::new()
            .with("invoice_number", self.invoice_number.as_str())
            .with("product_name", self.product_name.as_str())
            .with("total_amount", self.total_amount)
            .with("buyer_name", self.buyer_name.as_str())
            .with("buyer_phone", self.buyer_phone.as_str())
            .with("discount", self.discount)
            .with("seller_name", self.seller_name.as_str())
            .with("seller_phone", self.seller_phone.as_str())
            .with("description", self.description.as_str())
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_amount(&raw))
}
