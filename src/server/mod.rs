pub mod envelope;
pub mod routes_lean;
pub mod routes_plaid;
pub mod routes_records;
pub mod server;
