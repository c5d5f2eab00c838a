use crate::config::UiConfig;
use std::time::Instant;
use stockdash_domain::entities::dataset::TickDataset;
use stockdash_domain::repositories::tick_source::TickSource;
use stockdash_domain::services::figures::build_chart_bundle;
use stockdash_domain::value_objects::chart_type::ChartType;
use stockdash_domain::value_objects::figure::ChartBundle;
use stockdash_domain::value_objects::stock::Stock;
use stockdash_domain::value_objects::theme::Theme;
use tracing::info_span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    StockChanged,
    ChartTypeChanged,
    TimerTick { n_intervals: u64 },
}

impl Trigger {
    pub fn label(&self) -> &'static str {
        match self {
            Trigger::Initial => "initial",
            Trigger::StockChanged => "stock",
            Trigger::ChartTypeChanged => "chart_type",
            Trigger::TimerTick { .. } => "timer",
        }
    }

    pub fn parse(kind: &str, n_intervals: Option<u64>) -> Result<Self, String> {
        match kind.trim().to_lowercase().as_str() {
            "" | "initial" => Ok(Trigger::Initial),
            "stock" => Ok(Trigger::StockChanged),
            "chart_type" | "chart-type" => Ok(Trigger::ChartTypeChanged),
            "timer" | "interval" => Ok(Trigger::TimerTick {
                n_intervals: n_intervals.unwrap_or(0),
            }),
            _ => Err(format!("unsupported trigger: {kind}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub stock: Stock,
    pub chart_type: ChartType,
    pub theme: Theme,
}

impl Selection {
    pub fn from_ui(ui: &UiConfig) -> Self {
        Self {
            stock: ui.default_stock,
            chart_type: ui.default_chart_type,
            theme: ui.default_theme,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Refresh {
    pub dataset: TickDataset,
    pub bundle: ChartBundle,
}

fn record_refresh_metrics<T>(trigger: Trigger, start: Instant, result: &Result<T, String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "stockdash.app.refresh_total",
        "trigger" => trigger.label(),
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("stockdash.app.refresh_ms", "trigger" => trigger.label())
        .record(start.elapsed().as_secs_f64() * 1000.0);
}

/// Regenerates the dataset, filters it to `stock` and rebuilds all four figures.
///
/// Errors are construction failures and callers treat them as fatal.
pub fn update_charts(
    source: &dyn TickSource,
    stock: Stock,
    chart_type: ChartType,
    trigger: Trigger,
) -> Result<Refresh, String> {
    let span = info_span!(
        "dashboard.refresh",
        stock = %stock,
        chart_type = %chart_type,
        trigger = trigger.label()
    );
    let _guard = span.enter();

    let start = Instant::now();
    let result = source.generate().and_then(|dataset| {
        build_chart_bundle(&dataset, stock, chart_type).map(|bundle| (dataset, bundle))
    });
    record_refresh_metrics(trigger, start, &result);

    let (dataset, bundle) = result.inspect_err(|err| {
        tracing::error!(error = %err, "dashboard refresh failed");
    })?;
    tracing::debug!(rows = dataset.len(), "charts rebuilt");
    Ok(Refresh { dataset, bundle })
}

/// Per-viewer dashboard state. Each session owns its dataset; nothing is shared
/// between sessions.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    selection: Selection,
    current: Option<Refresh>,
    refreshes: u64,
    n_intervals: u64,
}

impl DashboardSession {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            current: None,
            refreshes: 0,
            n_intervals: 0,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn dataset(&self) -> Option<&TickDataset> {
        self.current.as_ref().map(|c| &c.dataset)
    }

    pub fn bundle(&self) -> Option<&ChartBundle> {
        self.current.as_ref().map(|c| &c.bundle)
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn n_intervals(&self) -> u64 {
        self.n_intervals
    }

    pub fn select_stock(&mut self, stock: Stock) -> Option<Trigger> {
        if self.selection.stock == stock {
            return None;
        }
        self.selection.stock = stock;
        Some(Trigger::StockChanged)
    }

    pub fn select_chart_type(&mut self, chart_type: ChartType) -> Option<Trigger> {
        if self.selection.chart_type == chart_type {
            return None;
        }
        self.selection.chart_type = chart_type;
        Some(Trigger::ChartTypeChanged)
    }

    /// The theme is not an input of the update handler, so it never yields a trigger.
    pub fn select_theme(&mut self, theme: Theme) {
        self.selection.theme = theme;
    }

    pub fn tick(&mut self) -> Trigger {
        self.n_intervals += 1;
        Trigger::TimerTick {
            n_intervals: self.n_intervals,
        }
    }

    pub fn refresh(
        &mut self,
        source: &dyn TickSource,
        trigger: Trigger,
    ) -> Result<&ChartBundle, String> {
        let refresh = update_charts(
            source,
            self.selection.stock,
            self.selection.chart_type,
            trigger,
        )?;
        self.refreshes += 1;
        let current = self.current.insert(refresh);
        Ok(&current.bundle)
    }
}
