//! Domain building blocks for the roll inventory service.
//!
//! Everything in this crate is pure: no database access, no HTTP. The `db`
//! and `api` crates build on these types and rules.

pub mod error;
pub mod statistics;
pub mod time;
pub mod types;
