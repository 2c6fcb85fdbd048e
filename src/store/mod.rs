//! Storefront backend access: wire types, HTTP client, and the
//! lookup-with-fallback strategy.

pub mod api_types;
pub mod client;
pub mod fallback;
pub mod types;
