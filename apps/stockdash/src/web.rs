use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use stockdash_application::config::UiConfig;
use stockdash_application::dashboard::{update_charts, Trigger};
use stockdash_application::layout::{build_layout, LayoutDescriptor};
use stockdash_domain::repositories::tick_source::TickSource;
use stockdash_domain::value_objects::chart_type::ChartType;
use stockdash_domain::value_objects::figure::Pane;
use stockdash_domain::value_objects::stock::Stock;
use stockdash_infrastructure::plotly::bundle_to_plotly;
use stockdash_infrastructure::reporting::PLOTLY_CDN;

/// Shared, read-only server state. Every request regenerates its own dataset.
#[derive(Clone)]
pub struct WebState {
    pub layout: Arc<LayoutDescriptor>,
    pub source: Arc<dyn TickSource + Send + Sync>,
}

impl WebState {
    pub fn new(ui: &UiConfig, source: Arc<dyn TickSource + Send + Sync>) -> Result<Self, String> {
        let initial = source.generate()?;
        let layout = build_layout(&initial, ui)?;
        Ok(Self {
            layout: Arc::new(layout),
            source,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartsQuery {
    pub stock: Option<String>,
    pub chart_type: Option<String>,
    pub trigger: Option<String>,
    pub n_intervals: Option<u64>,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/api/layout", get(get_layout))
        .route("/api/charts", get(get_charts))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: WebState) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind {addr}: {err}"))?;
    tracing::info!(%addr, "dashboard server listening");
    axum::serve(listener, router(state))
        .await
        .map_err(|err| format!("server error: {err}"))
}

fn record_request(route: &'static str, status: StatusCode) {
    metrics::counter!(
        "stockdash.web.requests_total",
        "route" => route,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

async fn get_index(State(state): State<WebState>) -> Html<String> {
    record_request("index", StatusCode::OK);
    Html(render_index_html(&state.layout))
}

async fn get_layout(State(state): State<WebState>) -> Json<LayoutDescriptor> {
    record_request("layout", StatusCode::OK);
    Json(state.layout.as_ref().clone())
}

async fn get_charts(
    State(state): State<WebState>,
    Query(query): Query<ChartsQuery>,
) -> (StatusCode, Json<Value>) {
    let (status, body) = match charts(&state, &query) {
        Ok(figures) => (StatusCode::OK, figures),
        Err((status, error)) => (status, json!({ "status": "error", "error": error })),
    };
    record_request("charts", status);
    (status, Json(body))
}

fn charts(state: &WebState, query: &ChartsQuery) -> Result<Value, (StatusCode, String)> {
    let stock = match query.stock.as_deref() {
        Some(raw) => raw
            .parse::<Stock>()
            .map_err(|err| (StatusCode::BAD_REQUEST, err))?,
        None => parse_default(&state.layout.stock_dropdown.value)?,
    };
    if !state.layout.stocks.contains(&stock) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("stock {stock} is not among the dashboard options"),
        ));
    }
    let chart_type = match query.chart_type.as_deref() {
        Some(raw) => raw
            .parse::<ChartType>()
            .map_err(|err| (StatusCode::BAD_REQUEST, err))?,
        None => parse_default(&state.layout.chart_type_dropdown.value)?,
    };
    let trigger = Trigger::parse(query.trigger.as_deref().unwrap_or(""), query.n_intervals)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let refresh = update_charts(state.source.as_ref(), stock, chart_type, trigger)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err))?;
    Ok(bundle_to_plotly(&refresh.bundle))
}

fn parse_default<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T, (StatusCode, String)> {
    raw.parse()
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err))
}

fn render_index_html(layout: &LayoutDescriptor) -> String {
    let panes: String = layout
        .grid
        .iter()
        .flatten()
        .map(|pane: &Pane| format!("    <div class=\"card\"><div id=\"{}\"></div></div>\n", pane.id()))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>{title}</title>
  <script src="{PLOTLY_CDN}"></script>
  <style>
    body {{ font-family: ui-sans-serif, system-ui; padding: 24px; }}
    .controls {{ display: flex; gap: 24px; margin-bottom: 16px; }}
    .controls label {{ display: block; font-size: 12px; color: #666; }}
    .grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 16px; align-items: start; }}
    .card {{ border: 1px solid #ddd; border-radius: 10px; padding: 8px; background: #fff; }}
    .card > div {{ height: 360px; }}
    .error {{ color: #b00; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div class="controls">
    <div><label for="{stock_id}"></label><select id="{stock_id}"></select></div>
    <div><label for="{chart_type_id}"></label><select id="{chart_type_id}"></select></div>
    <div><label for="{theme_id}"></label><select id="{theme_id}"></select></div>
  </div>
  <p id="status" class="error"></p>
  <div class="grid">
{panes}  </div>

  <script>
    let nIntervals = 0;

    function fillDropdown(dropdown) {{
      const select = document.getElementById(dropdown.id);
      document.querySelector(`label[for="${{dropdown.id}}"]`).textContent = dropdown.label;
      for (const opt of dropdown.options) {{
        const el = document.createElement('option');
        el.value = opt.value;
        el.textContent = opt.label;
        select.appendChild(el);
      }}
      select.value = dropdown.value;
      return select;
    }}

    async function refresh(trigger) {{
      const params = new URLSearchParams({{
        stock: document.getElementById('{stock_id}').value,
        chart_type: document.getElementById('{chart_type_id}').value,
        trigger: trigger,
        n_intervals: String(nIntervals),
      }});
      const resp = await fetch(`/api/charts?${{params}}`);
      const body = await resp.json();
      const status = document.getElementById('status');
      if (!resp.ok) {{
        status.textContent = body.error || `request failed (${{resp.status}})`;
        return;
      }}
      status.textContent = '';
      for (const [id, fig] of Object.entries(body)) {{
        Plotly.react(id, fig.data, fig.layout, {{ responsive: true }});
      }}
    }}

    async function main() {{
      const layout = await (await fetch('/api/layout')).json();
      fillDropdown(layout.stock_dropdown).addEventListener('change', () => refresh('stock'));
      fillDropdown(layout.chart_type_dropdown).addEventListener('change', () => refresh('chart_type'));
      fillDropdown(layout.theme_dropdown);
      await refresh('initial');
      setInterval(() => {{
        nIntervals += 1;
        refresh('timer');
      }}, layout.interval.interval_ms);
    }}

    main();
  </script>
</body>
</html>"#,
        title = layout.title,
        stock_id = layout.stock_dropdown.id,
        chart_type_id = layout.chart_type_dropdown.id,
        theme_id = layout.theme_dropdown.id,
    )
}
