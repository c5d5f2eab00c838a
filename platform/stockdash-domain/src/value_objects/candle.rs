use serde::{Deserialize, Serialize};

pub const OPEN_OFFSET: i64 = -5;
pub const HIGH_OFFSET: i64 = 10;
pub const LOW_OFFSET: i64 = -15;

/// Presentation-only OHLC derived from a single price by fixed offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticCandle {
    pub open: i64,
    pub high: i64,
    pub low: i64,
    pub close: i64,
}

impl SyntheticCandle {
    pub fn from_price(price: i64) -> Self {
        Self {
            open: price + OPEN_OFFSET,
            high: price + HIGH_OFFSET,
            low: price + LOW_OFFSET,
            close: price,
        }
    }
}
