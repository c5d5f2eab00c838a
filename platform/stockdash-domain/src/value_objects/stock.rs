use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stock {
    Apple,
    Meta,
    Google,
    Tesla,
}

impl Stock {
    /// Generation order: dataset row `i` belongs to `ALL[i % 4]`.
    pub const ALL: [Stock; 4] = [Stock::Apple, Stock::Meta, Stock::Google, Stock::Tesla];

    pub fn as_str(self) -> &'static str {
        match self {
            Stock::Apple => "Apple",
            Stock::Meta => "Meta",
            Stock::Google => "Google",
            Stock::Tesla => "Tesla",
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stock {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "apple" => Ok(Stock::Apple),
            "meta" => Ok(Stock::Meta),
            "google" => Ok(Stock::Google),
            "tesla" => Ok(Stock::Tesla),
            _ => Err(format!("unknown stock: {value}")),
        }
    }
}
