//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod roll_repo;

pub use roll_repo::{RemoveOutcome, RollRepo};
