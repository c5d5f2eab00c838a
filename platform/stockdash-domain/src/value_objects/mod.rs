pub mod candle;
pub mod chart_type;
pub mod figure;
pub mod stock;
pub mod theme;
pub mod tick;
