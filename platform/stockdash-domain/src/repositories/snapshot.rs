use crate::entities::dataset::TickDataset;
use crate::value_objects::figure::ChartBundle;
use std::path::Path;

pub trait SnapshotWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    fn write_ticks_csv(&self, path: &Path, dataset: &TickDataset) -> Result<(), String>;
    fn write_figures_json(&self, path: &Path, bundle: &ChartBundle) -> Result<(), String>;
    fn write_dashboard_html(
        &self,
        path: &Path,
        title: &str,
        bundle: &ChartBundle,
    ) -> Result<(), String>;
}
