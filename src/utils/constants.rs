//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 0;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_RECORDS_PATH: &str = "data/connections.jsonl";

/// trailing window used by the transactions call when no dates are given
pub const DEFAULT_TRANSACTIONS_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_CONSENT_REVOKE_REASON: &str = "USER_REQUESTED";

pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const SCOPE_API: &str = "api";
pub const SCOPE_CUSTOMER_PREFIX: &str = "customer.";

// Vendor labels used in metrics and errors
pub const VENDOR_LEAN: &str = "lean";
pub const VENDOR_PLAID: &str = "plaid";
