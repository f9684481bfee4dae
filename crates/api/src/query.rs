//! Query parameter types for API handlers that are not repository filters.

use rollstock_core::time::deserialize_instant;
use rollstock_core::types::Timestamp;
use serde::Deserialize;

/// Required window for `GET /rolls/statistics` (`?start_date=&end_date=`).
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    #[serde(deserialize_with = "deserialize_instant")]
    pub start_date: Timestamp,
    #[serde(deserialize_with = "deserialize_instant")]
    pub end_date: Timestamp,
}
