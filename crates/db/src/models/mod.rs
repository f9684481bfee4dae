//! Row structs and DTOs.
//!
//! `roll` holds the persisted entity, its create DTO and list filter;
//! `statistics` holds the aggregate report and the rows it is built from.

pub mod roll;
pub mod statistics;
