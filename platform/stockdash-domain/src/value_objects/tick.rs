use crate::value_objects::stock::Stock;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub stock: Stock,
    pub price: i64,
    pub volume: i64,
    pub market_share: f64,
    pub time: NaiveDate,
}
