use crate::layout::LayoutDescriptor;
use std::path::{Path, PathBuf};
use stockdash_domain::entities::dataset::TickDataset;
use stockdash_domain::repositories::snapshot::SnapshotWriter;
use stockdash_domain::value_objects::figure::ChartBundle;
use tracing::info_span;

pub const TICKS_CSV: &str = "ticks.csv";
pub const FIGURES_JSON: &str = "figures.json";
pub const DASHBOARD_HTML: &str = "dashboard.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub out_dir: PathBuf,
    pub ticks_csv: PathBuf,
    pub figures_json: PathBuf,
    pub dashboard_html: PathBuf,
}

impl SnapshotPaths {
    pub fn under(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            ticks_csv: out_dir.join(TICKS_CSV),
            figures_json: out_dir.join(FIGURES_JSON),
            dashboard_html: out_dir.join(DASHBOARD_HTML),
        }
    }
}

pub fn export_snapshot(
    writer: &dyn SnapshotWriter,
    out_dir: &Path,
    layout: &LayoutDescriptor,
    dataset: &TickDataset,
    bundle: &ChartBundle,
) -> Result<SnapshotPaths, String> {
    let span = info_span!("snapshot.export", out_dir = %out_dir.display());
    let _guard = span.enter();

    let paths = SnapshotPaths::under(out_dir);
    writer.ensure_dir(&paths.out_dir)?;
    writer.write_ticks_csv(&paths.ticks_csv, dataset)?;
    writer.write_figures_json(&paths.figures_json, bundle)?;
    writer.write_dashboard_html(&paths.dashboard_html, layout.title, bundle)?;

    tracing::info!(rows = dataset.len(), "snapshot written");
    Ok(paths)
}
