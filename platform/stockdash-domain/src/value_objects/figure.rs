use crate::value_objects::candle::SyntheticCandle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pane {
    Price,
    Volume,
    MarketShare,
    Kpi,
}

impl Pane {
    /// Grid order: row-major over a 2x2 layout.
    pub const ALL: [Pane; 4] = [Pane::Price, Pane::Volume, Pane::MarketShare, Pane::Kpi];

    pub fn id(self) -> &'static str {
        match self {
            Pane::Price => "price-chart",
            Pane::Volume => "volume-chart",
            Pane::MarketShare => "market-share-chart",
            Pane::Kpi => "kpi-chart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    Bar,
    Line,
    Area,
    Candlestick,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Series {
    Bar {
        x: Vec<NaiveDate>,
        y: Vec<f64>,
    },
    Line {
        x: Vec<NaiveDate>,
        y: Vec<f64>,
    },
    Area {
        x: Vec<NaiveDate>,
        y: Vec<f64>,
    },
    Candlestick {
        x: Vec<NaiveDate>,
        candles: Vec<SyntheticCandle>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

impl Series {
    pub fn kind(&self) -> FigureKind {
        match self {
            Series::Bar { .. } => FigureKind::Bar,
            Series::Line { .. } => FigureKind::Line,
            Series::Area { .. } => FigureKind::Area,
            Series::Candlestick { .. } => FigureKind::Candlestick,
            Series::Pie { .. } => FigureKind::Pie,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Series::Bar { x, .. } | Series::Line { x, .. } | Series::Area { x, .. } => x.len(),
            Series::Candlestick { x, .. } => x.len(),
            Series::Pie { labels, .. } => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("series is empty".to_string());
        }
        match self {
            Series::Bar { x, y } | Series::Line { x, y } | Series::Area { x, y } => {
                if x.len() != y.len() {
                    return Err(format!("x has {} points but y has {}", x.len(), y.len()));
                }
                if y.iter().any(|v| !v.is_finite()) {
                    return Err("y contains non-finite values".to_string());
                }
            }
            Series::Candlestick { x, candles } => {
                if x.len() != candles.len() {
                    return Err(format!(
                        "x has {} points but {} candles",
                        x.len(),
                        candles.len()
                    ));
                }
                if let Some(bad) = candles.iter().find(|c| c.low > c.high) {
                    return Err(format!("candle low {} above high {}", bad.low, bad.high));
                }
            }
            Series::Pie { labels, values } => {
                if labels.len() != values.len() {
                    return Err(format!(
                        "{} labels but {} values",
                        labels.len(),
                        values.len()
                    ));
                }
                if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err("pie values must be finite and non-negative".to_string());
                }
            }
        }
        Ok(())
    }
}

/// A displayable chart object: one series plus titles, bound to a grid pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub pane: Pane,
    pub title: String,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub series: Series,
}

impl Figure {
    pub fn kind(&self) -> FigureKind {
        self.series.kind()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.series
            .validate()
            .map_err(|err| format!("invalid figure {} ({}): {err}", self.pane.id(), self.title))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBundle {
    pub price: Figure,
    pub volume: Figure,
    pub market_share: Figure,
    pub kpi: Figure,
}

impl ChartBundle {
    pub fn figures(&self) -> [&Figure; 4] {
        [&self.price, &self.volume, &self.market_share, &self.kpi]
    }

    pub fn get(&self, pane: Pane) -> &Figure {
        match pane {
            Pane::Price => &self.price,
            Pane::Volume => &self.volume,
            Pane::MarketShare => &self.market_share,
            Pane::Kpi => &self.kpi,
        }
    }
}
