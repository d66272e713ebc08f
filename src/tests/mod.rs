pub mod common;
pub mod proxy_calls;
