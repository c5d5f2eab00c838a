use crate::plotly::bundle_to_plotly;
use std::fs;
use std::io::Write;
use std::path::Path;
use stockdash_domain::entities::dataset::TickDataset;
use stockdash_domain::value_objects::figure::{ChartBundle, Pane};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub fn write_ticks_csv(path: &Path, dataset: &TickDataset) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create ticks csv {}: {}", path.display(), err))?;
    wtr.write_record(["time", "stock", "price", "volume", "market_share"])
        .map_err(|err| format!("failed to write ticks csv header: {}", err))?;

    for record in dataset.records() {
        wtr.write_record([
            record.time.format("%Y-%m-%d").to_string(),
            record.stock.to_string(),
            record.price.to_string(),
            record.volume.to_string(),
            record.market_share.to_string(),
        ])
        .map_err(|err| format!("failed to write ticks row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush ticks csv: {}", err))
}

pub fn write_figures_json(path: &Path, bundle: &ChartBundle) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&bundle_to_plotly(bundle))
        .map_err(|err| format!("failed to serialize figures: {err}"))?;
    fs::write(path, json)
        .map_err(|err| format!("failed to write figures json {}: {}", path.display(), err))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Static page laying the four figures out on the dashboard's 2x2 grid.
pub fn render_dashboard_html(title: &str, bundle: &ChartBundle) -> Result<String, String> {
    let figures_json = serde_json::to_string(&bundle_to_plotly(bundle))
        .map_err(|err| format!("failed to serialize figures: {err}"))?
        .replace("</", "<\\/");
    let panes: String = Pane::ALL
        .iter()
        .map(|pane| format!("    <div class=\"card\"><div id=\"{}\"></div></div>\n", pane.id()))
        .collect();
    let title = escape_html(title);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>{title}</title>
  <script src="{PLOTLY_CDN}"></script>
  <style>
    body {{ font-family: ui-sans-serif, system-ui; padding: 24px; }}
    .grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 16px; align-items: start; }}
    .card {{ border: 1px solid #ddd; border-radius: 10px; padding: 8px; background: #fff; }}
    .card > div {{ height: 360px; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div class="grid">
{panes}  </div>

  <script>
    const figures = {figures_json};
    for (const [id, fig] of Object.entries(figures)) {{
      Plotly.newPlot(id, fig.data, fig.layout, {{ responsive: true }});
    }}
  </script>
</body>
</html>"#
    ))
}

pub fn write_dashboard_html(path: &Path, title: &str, bundle: &ChartBundle) -> Result<(), String> {
    let html = render_dashboard_html(title, bundle)?;
    let mut file =
        fs::File::create(path).map_err(|err| format!("failed to create html: {}", err))?;
    file.write_all(html.as_bytes())
        .map_err(|err| format!("failed to write html: {}", err))
}
