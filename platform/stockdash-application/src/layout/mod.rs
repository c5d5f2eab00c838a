use crate::config::{UiConfig, MAX_REFRESH_INTERVAL_MS};
use serde::Serialize;
use stockdash_domain::entities::dataset::TickDataset;
use stockdash_domain::value_objects::chart_type::ChartType;
use stockdash_domain::value_objects::figure::Pane;
use stockdash_domain::value_objects::stock::Stock;
use stockdash_domain::value_objects::theme::Theme;

pub const DASHBOARD_TITLE: &str = "Stock Dashboard";
pub const STOCK_DROPDOWN_ID: &str = "stock-dropdown";
pub const CHART_TYPE_DROPDOWN_ID: &str = "chart-type-dropdown";
pub const THEME_DROPDOWN_ID: &str = "theme-dropdown";
pub const INTERVAL_ID: &str = "interval-update";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub label: &'static str,
    pub options: Vec<DropdownOption>,
    pub value: String,
    pub clearable: bool,
}

impl Dropdown {
    pub fn selected_index(&self) -> usize {
        self.options
            .iter()
            .position(|o| o.value == self.value)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalTimer {
    pub id: &'static str,
    pub interval_ms: u64,
    pub n_intervals: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutDescriptor {
    pub title: &'static str,
    pub stock_dropdown: Dropdown,
    pub chart_type_dropdown: Dropdown,
    pub theme_dropdown: Dropdown,
    pub interval: IntervalTimer,
    pub grid: [[Pane; 2]; 2],
    /// Parsed mirror of `stock_dropdown.options`, in the same order.
    #[serde(skip)]
    pub stocks: Vec<Stock>,
}

pub fn build_layout(dataset: &TickDataset, ui: &UiConfig) -> Result<LayoutDescriptor, String> {
    if ui.refresh_interval_ms == 0 {
        return Err("refresh interval must be > 0".to_string());
    }
    if ui.refresh_interval_ms > MAX_REFRESH_INTERVAL_MS {
        return Err(format!(
            "refresh interval must be <= {MAX_REFRESH_INTERVAL_MS} ms"
        ));
    }

    let stocks = dataset.stocks();
    if !stocks.contains(&ui.default_stock) {
        return Err(format!(
            "default stock {} is not among the generated stocks",
            ui.default_stock
        ));
    }

    let stock_dropdown = Dropdown {
        id: STOCK_DROPDOWN_ID,
        label: "Select Stock",
        options: stocks
            .iter()
            .map(|s| DropdownOption {
                label: s.to_string(),
                value: s.to_string(),
            })
            .collect(),
        value: ui.default_stock.to_string(),
        clearable: false,
    };

    let chart_type_dropdown = Dropdown {
        id: CHART_TYPE_DROPDOWN_ID,
        label: "Select Chart Type",
        options: ChartType::ALL
            .iter()
            .map(|c| DropdownOption {
                label: c.label().to_string(),
                value: c.as_str().to_string(),
            })
            .collect(),
        value: ui.default_chart_type.as_str().to_string(),
        clearable: false,
    };

    let theme_dropdown = Dropdown {
        id: THEME_DROPDOWN_ID,
        label: "Select Theme",
        options: Theme::ALL
            .iter()
            .map(|t| DropdownOption {
                label: t.label().to_string(),
                value: t.as_str().to_string(),
            })
            .collect(),
        value: ui.default_theme.as_str().to_string(),
        clearable: false,
    };

    tracing::debug!(
        stocks = stocks.len(),
        interval_ms = ui.refresh_interval_ms,
        "layout built"
    );

    Ok(LayoutDescriptor {
        title: DASHBOARD_TITLE,
        stock_dropdown,
        chart_type_dropdown,
        theme_dropdown,
        interval: IntervalTimer {
            id: INTERVAL_ID,
            interval_ms: ui.refresh_interval_ms,
            n_intervals: 0,
        },
        grid: [
            [Pane::Price, Pane::Volume],
            [Pane::MarketShare, Pane::Kpi],
        ],
        stocks,
    })
}
