use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Candlestick,
}

impl ChartType {
    pub const ALL: [ChartType; 3] = [ChartType::Bar, ChartType::Line, ChartType::Candlestick];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Candlestick => "candlestick",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartType::Bar => "Bar Chart",
            ChartType::Line => "Line Chart",
            ChartType::Candlestick => "Candlestick Chart",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ChartType::Bar => ChartType::Line,
            ChartType::Line => ChartType::Candlestick,
            ChartType::Candlestick => ChartType::Bar,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ChartType::Bar => ChartType::Candlestick,
            ChartType::Line => ChartType::Bar,
            ChartType::Candlestick => ChartType::Line,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "candlestick" | "candle" => Ok(ChartType::Candlestick),
            _ => Err(format!("unsupported chart type: {value}")),
        }
    }
}
