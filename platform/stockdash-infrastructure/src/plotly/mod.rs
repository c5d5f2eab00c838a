//! Plotly.js figure JSON for the dashboard panes.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use stockdash_domain::value_objects::figure::{ChartBundle, Figure, Series};

fn dates(x: &[NaiveDate]) -> Vec<String> {
    x.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

fn trace(series: &Series) -> Value {
    match series {
        Series::Bar { x, y } => json!({
            "type": "bar",
            "x": dates(x),
            "y": y,
        }),
        Series::Line { x, y } => json!({
            "type": "scatter",
            "mode": "lines",
            "x": dates(x),
            "y": y,
        }),
        Series::Area { x, y } => json!({
            "type": "scatter",
            "mode": "lines",
            "fill": "tozeroy",
            "x": dates(x),
            "y": y,
        }),
        Series::Candlestick { x, candles } => json!({
            "type": "candlestick",
            "x": dates(x),
            "open": candles.iter().map(|c| c.open).collect::<Vec<_>>(),
            "high": candles.iter().map(|c| c.high).collect::<Vec<_>>(),
            "low": candles.iter().map(|c| c.low).collect::<Vec<_>>(),
            "close": candles.iter().map(|c| c.close).collect::<Vec<_>>(),
        }),
        Series::Pie { labels, values } => json!({
            "type": "pie",
            "labels": labels,
            "values": values,
        }),
    }
}

fn axis(title: Option<&str>) -> Value {
    match title {
        Some(text) => json!({ "title": { "text": text } }),
        None => json!({}),
    }
}

pub fn figure_to_plotly(figure: &Figure) -> Value {
    json!({
        "data": [trace(&figure.series)],
        "layout": {
            "title": { "text": figure.title },
            "xaxis": axis(figure.x_title.as_deref()),
            "yaxis": axis(figure.y_title.as_deref()),
        },
    })
}

/// Figures keyed by pane id.
pub fn bundle_to_plotly(bundle: &ChartBundle) -> Value {
    let mut out = Map::new();
    for figure in bundle.figures() {
        out.insert(figure.pane.id().to_string(), figure_to_plotly(figure));
    }
    Value::Object(out)
}
