use crate::value_objects::stock::Stock;
use crate::value_objects::tick::TickRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::ops::RangeInclusive;

pub const STOCK_CYCLES: usize = 5;
pub const ROWS_PER_DATASET: usize = Stock::ALL.len() * STOCK_CYCLES;
pub const PRICE_RANGE: RangeInclusive<i64> = 100..=3000;
pub const VOLUME_RANGE: RangeInclusive<i64> = 50..=200;
pub const MARKET_SHARE_MIN: f64 = 10.0;
pub const MARKET_SHARE_MAX: f64 = 40.0;

pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

/// One row's worth of independently drawn values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickDraw {
    pub price: i64,
    pub volume: i64,
    pub market_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickDataset {
    records: Vec<TickRecord>,
}

impl TickDataset {
    /// Assigns stock and date by position: row `i` gets `Stock::ALL[i % 4]` and `epoch + i days`.
    pub fn from_draws(draws: &[TickDraw]) -> Result<Self, String> {
        if draws.len() != ROWS_PER_DATASET {
            return Err(format!(
                "expected {ROWS_PER_DATASET} draws, got {}",
                draws.len()
            ));
        }

        let start = epoch();
        let mut records = Vec::with_capacity(ROWS_PER_DATASET);
        for (idx, draw) in draws.iter().enumerate() {
            if !PRICE_RANGE.contains(&draw.price) {
                return Err(format!("row {idx}: price {} out of range", draw.price));
            }
            if !VOLUME_RANGE.contains(&draw.volume) {
                return Err(format!("row {idx}: volume {} out of range", draw.volume));
            }
            if !(MARKET_SHARE_MIN..=MARKET_SHARE_MAX).contains(&draw.market_share) {
                return Err(format!(
                    "row {idx}: market share {} out of range",
                    draw.market_share
                ));
            }
            records.push(TickRecord {
                stock: Stock::ALL[idx % Stock::ALL.len()],
                price: draw.price,
                volume: draw.volume,
                market_share: draw.market_share,
                time: start + chrono::Duration::days(idx as i64),
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct stocks in first-appearance order.
    pub fn stocks(&self) -> Vec<Stock> {
        let mut out: Vec<Stock> = Vec::new();
        for record in &self.records {
            if !out.contains(&record.stock) {
                out.push(record.stock);
            }
        }
        out
    }

    pub fn rows_for(&self, stock: Stock) -> Vec<&TickRecord> {
        self.records.iter().filter(|r| r.stock == stock).collect()
    }
}
