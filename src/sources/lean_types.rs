use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub app_user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalancesQuery {
    #[serde(default)]
    pub entity_id: String,
    pub account_ids: Option<Vec<String>>,
    /// ISO-8601 timestamp, forwarded as received
    pub min_last_updated_datetime: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub account_id: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

// ----- outbound bodies -----

#[derive(Debug, Serialize)]
pub(crate) struct CreateCustomerBody<'a> {
    pub app_user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BalancesBody<'a> {
    pub entity_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<&'a [String]>,
    pub options: BalancesOptions<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BalancesOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_last_updated_datetime: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransactionsBody<'a> {
    pub entity_id: &'a str,
    pub account_id: &'a str,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub(crate) struct RevokeConsentBody<'a> {
    pub reason: &'a str,
}
