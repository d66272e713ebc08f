use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::utils::constants::{SCOPE_API, SCOPE_CUSTOMER_PREFIX};

/// OAuth scope a token was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenScope {
    /// API-level token, used for provisioning and data calls
    Api,
    /// token scoped to a single customer, handed to the browser SDK
    Customer(String),
}

impl TokenScope {
    pub fn customer(customer_id: impl Into<String>) -> Self {
        TokenScope::Customer(customer_id.into())
    }

    /// Low-cardinality label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenScope::Api => "api",
            TokenScope::Customer(_) => "customer",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenScope::Api => f.write_str(SCOPE_API),
            TokenScope::Customer(id) => write!(f, "{}{}", SCOPE_CUSTOMER_PREFIX, id),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub scope: TokenScope,
    /// scope string as echoed by the vendor, falls back to the requested scope
    pub granted_scope: String,
    /// lifetime declared by the vendor, in seconds
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// `None` when `expires_in` does not fit the calendar from `issued_at`.
    pub fn new(
        value: String,
        scope: TokenScope,
        granted_scope: Option<String>,
        expires_in: u64,
        issued_at: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(seconds(expires_in)?)?;
        let granted_scope = granted_scope.unwrap_or_else(|| scope.to_string());
        Some(Self { value, scope, granted_scope, expires_in, expires_at })
    }

    /// Usable at `now` when it leaves at least `safety_margin_seconds` before expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>, safety_margin_seconds: u64) -> bool {
        seconds(safety_margin_seconds)
            .and_then(|margin| now.checked_add_signed(margin))
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

fn seconds(value: u64) -> Option<Duration> {
    i64::try_from(value).ok().and_then(Duration::try_seconds)
}

// token values never go to logs
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
