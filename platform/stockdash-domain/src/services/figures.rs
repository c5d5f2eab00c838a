use crate::entities::dataset::TickDataset;
use crate::value_objects::candle::SyntheticCandle;
use crate::value_objects::chart_type::ChartType;
use crate::value_objects::figure::{ChartBundle, Figure, Pane, Series};
use crate::value_objects::stock::Stock;
use crate::value_objects::tick::TickRecord;
use chrono::NaiveDate;

pub const MARKET_SHARE_TITLE: &str = "Market Share Distribution";

fn times(rows: &[&TickRecord]) -> Vec<NaiveDate> {
    rows.iter().map(|r| r.time).collect()
}

fn prices(rows: &[&TickRecord]) -> Vec<f64> {
    rows.iter().map(|r| r.price as f64).collect()
}

pub fn price_figure(stock: Stock, chart_type: ChartType, rows: &[&TickRecord]) -> Figure {
    let (title, series) = match chart_type {
        ChartType::Bar => (
            format!("{stock} Price Trend"),
            Series::Bar {
                x: times(rows),
                y: prices(rows),
            },
        ),
        ChartType::Line => (
            format!("{stock} Price Trend"),
            Series::Line {
                x: times(rows),
                y: prices(rows),
            },
        ),
        ChartType::Candlestick => (
            format!("{stock} Candlestick Chart"),
            Series::Candlestick {
                x: times(rows),
                candles: rows
                    .iter()
                    .map(|r| SyntheticCandle::from_price(r.price))
                    .collect(),
            },
        ),
    };

    Figure {
        pane: Pane::Price,
        title,
        x_title: Some("Time".to_string()),
        y_title: Some("Price".to_string()),
        series,
    }
}

pub fn volume_figure(stock: Stock, rows: &[&TickRecord]) -> Figure {
    Figure {
        pane: Pane::Volume,
        title: format!("{stock} Trading Volume"),
        x_title: Some("Time".to_string()),
        y_title: Some("Volume".to_string()),
        series: Series::Area {
            x: times(rows),
            y: rows.iter().map(|r| r.volume as f64).collect(),
        },
    }
}

/// Slices are grouped by stock name over whatever rows are passed in.
pub fn market_share_figure(rows: &[&TickRecord]) -> Figure {
    let mut labels: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for row in rows {
        let label = row.stock.as_str();
        match labels.iter().position(|l| l == label) {
            Some(idx) => values[idx] += row.market_share,
            None => {
                labels.push(label.to_string());
                values.push(row.market_share);
            }
        }
    }

    Figure {
        pane: Pane::MarketShare,
        title: MARKET_SHARE_TITLE.to_string(),
        x_title: None,
        y_title: None,
        series: Series::Pie { labels, values },
    }
}

// Titled as a moving average, plotted as raw price.
pub fn kpi_figure(stock: Stock, rows: &[&TickRecord]) -> Figure {
    Figure {
        pane: Pane::Kpi,
        title: format!("{stock} KPI - Moving Average"),
        x_title: Some("Time".to_string()),
        y_title: Some("Price".to_string()),
        series: Series::Line {
            x: times(rows),
            y: prices(rows),
        },
    }
}

pub fn build_chart_bundle(
    dataset: &TickDataset,
    stock: Stock,
    chart_type: ChartType,
) -> Result<ChartBundle, String> {
    let rows = dataset.rows_for(stock);
    if rows.is_empty() {
        return Err(format!("dataset has no rows for stock {stock}"));
    }

    let bundle = ChartBundle {
        price: price_figure(stock, chart_type, &rows),
        volume: volume_figure(stock, &rows),
        market_share: market_share_figure(&rows),
        kpi: kpi_figure(stock, &rows),
    };
    for figure in bundle.figures() {
        figure.validate()?;
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::{build_chart_bundle, market_share_figure};
    use crate::entities::dataset::{TickDataset, TickDraw, ROWS_PER_DATASET};
    use crate::value_objects::chart_type::ChartType;
    use crate::value_objects::figure::{FigureKind, Series};
    use crate::value_objects::stock::Stock;

    fn dataset() -> TickDataset {
        let draws: Vec<TickDraw> = (0..ROWS_PER_DATASET)
            .map(|idx| TickDraw {
                price: 1000 + idx as i64 * 10,
                volume: 100 + idx as i64,
                market_share: 20.0,
            })
            .collect();
        TickDataset::from_draws(&draws).expect("dataset")
    }

    #[test]
    fn price_figure_kind_follows_chart_type() {
        let data = dataset();
        for (chart_type, expected) in [
            (ChartType::Bar, FigureKind::Bar),
            (ChartType::Line, FigureKind::Line),
            (ChartType::Candlestick, FigureKind::Candlestick),
        ] {
            let bundle = build_chart_bundle(&data, Stock::Meta, chart_type).expect("bundle");
            assert_eq!(bundle.price.kind(), expected);
        }
    }

    #[test]
    fn titles_follow_selected_stock() {
        let bundle = build_chart_bundle(&dataset(), Stock::Google, ChartType::Bar).expect("bundle");
        assert_eq!(bundle.price.title, "Google Price Trend");
        assert_eq!(bundle.volume.title, "Google Trading Volume");
        assert_eq!(bundle.market_share.title, "Market Share Distribution");
        assert_eq!(bundle.kpi.title, "Google KPI - Moving Average");

        let candle =
            build_chart_bundle(&dataset(), Stock::Google, ChartType::Candlestick).expect("bundle");
        assert_eq!(candle.price.title, "Google Candlestick Chart");
    }

    #[test]
    fn kpi_plots_raw_price_without_smoothing() {
        let data = dataset();
        let bundle = build_chart_bundle(&data, Stock::Apple, ChartType::Bar).expect("bundle");
        let expected: Vec<f64> = data
            .rows_for(Stock::Apple)
            .iter()
            .map(|r| r.price as f64)
            .collect();
        match &bundle.kpi.series {
            Series::Line { y, .. } => assert_eq!(y, &expected),
            other => panic!("unexpected kpi series: {other:?}"),
        }
    }

    #[test]
    fn market_share_groups_slices_by_stock() {
        let data = dataset();
        let all: Vec<_> = data.records().iter().collect();
        let figure = market_share_figure(&all);
        match figure.series {
            Series::Pie { labels, values } => {
                assert_eq!(labels, vec!["Apple", "Meta", "Google", "Tesla"]);
                assert!(values.iter().all(|v| (*v - 100.0).abs() < 1e-9));
            }
            other => panic!("unexpected series: {other:?}"),
        }
    }
}
