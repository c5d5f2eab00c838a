use std::path::PathBuf;
use stockdash_application::config::Config;
use stockdash_application::dashboard::{update_charts, Trigger};
use stockdash_application::layout::build_layout;
use stockdash_application::snapshot::export_snapshot;
use stockdash_domain::repositories::tick_source::TickSource;
use stockdash_domain::value_objects::chart_type::ChartType;
use stockdash_domain::value_objects::stock::Stock;
use stockdash_infrastructure::artifacts::FilesystemArtifactWriter;
use stockdash_infrastructure::plotly::bundle_to_plotly;

#[derive(Debug, Clone, Default)]
pub struct HeadlessArgs {
    pub stock: Option<Stock>,
    pub chart_type: Option<ChartType>,
    pub out_dir: Option<PathBuf>,
}

/// Renders one refresh for the requested selection and optionally writes a snapshot.
pub fn run_headless(
    config: &Config,
    source: &dyn TickSource,
    args: HeadlessArgs,
) -> Result<serde_json::Value, String> {
    let initial = source.generate()?;
    let layout = build_layout(&initial, &config.ui)?;

    let stock = args.stock.unwrap_or(config.ui.default_stock);
    if !layout.stocks.contains(&stock) {
        return Err(format!("stock {stock} is not among the dashboard options"));
    }
    let chart_type = args.chart_type.unwrap_or(config.ui.default_chart_type);

    let refresh = update_charts(source, stock, chart_type, Trigger::Initial)?;
    let figures = bundle_to_plotly(&refresh.bundle);

    let Some(out_dir) = args.out_dir else {
        return Ok(serde_json::json!({
            "status": "ok",
            "mode": "render",
            "stock": stock.as_str(),
            "chart_type": chart_type.as_str(),
            "figures": figures,
        }));
    };

    let writer = FilesystemArtifactWriter::new();
    let paths = export_snapshot(&writer, &out_dir, &layout, &refresh.dataset, &refresh.bundle)?;
    Ok(serde_json::json!({
        "status": "ok",
        "mode": "snapshot",
        "stock": stock.as_str(),
        "chart_type": chart_type.as_str(),
        "figures": figures,
        "artifacts": {
            "out_dir": paths.out_dir.display().to_string(),
            "ticks_csv": paths.ticks_csv.display().to_string(),
            "figures_json": paths.figures_json.display().to_string(),
            "dashboard_html": paths.dashboard_html.display().to_string(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::{run_headless, HeadlessArgs};
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use stockdash_application::config::Config;
    use stockdash_domain::entities::dataset::TickDataset;
    use stockdash_domain::repositories::tick_source::TickSource;
    use stockdash_domain::value_objects::chart_type::ChartType;
    use stockdash_domain::value_objects::stock::Stock;
    use stockdash_infrastructure::market_data::random::RandomTickSource;

    /// Serves `budget` datasets, then fails.
    struct ExhaustingTickSource {
        inner: RandomTickSource,
        budget: Cell<usize>,
    }

    impl TickSource for ExhaustingTickSource {
        fn generate(&self) -> Result<TickDataset, String> {
            let left = self.budget.get();
            if left == 0 {
                return Err("tick feed exhausted".to_string());
            }
            self.budget.set(left - 1);
            self.inner.generate()
        }
    }

    fn unique_tmp_dir(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("stockdash_{prefix}_{}_{}", std::process::id(), now))
    }

    #[test]
    fn render_mode_returns_four_figures() {
        let value = run_headless(
            &Config::default(),
            &RandomTickSource::with_seed(5),
            HeadlessArgs {
                stock: Some(Stock::Tesla),
                chart_type: Some(ChartType::Line),
                out_dir: None,
            },
        )
        .expect("headless");

        assert_eq!(value["status"], "ok");
        assert_eq!(value["mode"], "render");
        assert_eq!(value["stock"], "Tesla");
        assert_eq!(value["figures"]["price-chart"]["data"][0]["mode"], "lines");
        assert_eq!(value["figures"]["market-share-chart"]["data"][0]["labels"][0], "Tesla");
        assert!(value.get("artifacts").is_none());
    }

    #[test]
    fn snapshot_mode_writes_artifacts() {
        let out_dir = unique_tmp_dir("headless");
        let value = run_headless(
            &Config::default(),
            &RandomTickSource::with_seed(6),
            HeadlessArgs {
                out_dir: Some(out_dir.clone()),
                ..HeadlessArgs::default()
            },
        )
        .expect("headless");

        assert_eq!(value["mode"], "snapshot");
        assert_eq!(value["stock"], "Apple");
        assert_eq!(value["chart_type"], "bar");
        assert!(out_dir.join("ticks.csv").exists());
        assert!(out_dir.join("figures.json").exists());
        assert!(out_dir.join("dashboard.html").exists());
    }

    #[test]
    fn refresh_failure_aborts_the_run() {
        let out_dir = unique_tmp_dir("headless_fail");
        let source = ExhaustingTickSource {
            inner: RandomTickSource::with_seed(7),
            budget: Cell::new(1),
        };
        let err = run_headless(
            &Config::default(),
            &source,
            HeadlessArgs {
                out_dir: Some(out_dir.clone()),
                ..HeadlessArgs::default()
            },
        )
        .expect_err("should fail");

        assert_eq!(err, "tick feed exhausted");
        assert!(!out_dir.exists());
    }

    #[test]
    fn initial_generation_failure_is_reported() {
        let source = ExhaustingTickSource {
            inner: RandomTickSource::with_seed(8),
            budget: Cell::new(0),
        };
        let err = run_headless(&Config::default(), &source, HeadlessArgs::default())
            .expect_err("should fail");
        assert_eq!(err, "tick feed exhausted");
    }
}
