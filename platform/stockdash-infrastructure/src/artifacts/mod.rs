use crate::reporting;
use std::fs;
use std::path::Path;
use std::time::Instant;
use stockdash_domain::entities::dataset::TickDataset;
use stockdash_domain::repositories::snapshot::SnapshotWriter;
use stockdash_domain::value_objects::figure::ChartBundle;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifactWriter;

impl FilesystemArtifactWriter {
    pub fn new() -> Self {
        Self
    }
}

fn record_write_metrics(kind: &'static str, start: Instant, result: &Result<(), String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "stockdash.infra.artifacts.write.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("stockdash.infra.artifacts.write_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
    if let Err(err) = result {
        tracing::warn!(kind, error = %err, "artifact write failed");
    }
}

impl SnapshotWriter for FilesystemArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        let start = Instant::now();
        let result = fs::create_dir_all(path)
            .map_err(|err| format!("failed to create dir {}: {}", path.display(), err));
        record_write_metrics("ensure_dir", start, &result);
        result
    }

    fn write_ticks_csv(&self, path: &Path, dataset: &TickDataset) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_ticks_csv(path, dataset);
        record_write_metrics("ticks_csv", start, &result);
        result
    }

    fn write_figures_json(&self, path: &Path, bundle: &ChartBundle) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_figures_json(path, bundle);
        record_write_metrics("figures_json", start, &result);
        result
    }

    fn write_dashboard_html(
        &self,
        path: &Path,
        title: &str,
        bundle: &ChartBundle,
    ) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_dashboard_html(path, title, bundle);
        record_write_metrics("dashboard_html", start, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::FilesystemArtifactWriter;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use stockdash_domain::repositories::snapshot::SnapshotWriter;

    fn unique_tmp_dir(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("stockdash_{prefix}_{}_{}", std::process::id(), now))
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let dir = unique_tmp_dir("artifacts").join("a").join("b");
        FilesystemArtifactWriter::new()
            .ensure_dir(&dir)
            .expect("ensure dir");
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_reports_file_in_the_way() {
        let base = unique_tmp_dir("artifacts_conflict");
        let _ = fs::create_dir_all(&base);
        let blocker = base.join("blocker");
        fs::write(&blocker, b"x").expect("write blocker");

        let err = FilesystemArtifactWriter::new()
            .ensure_dir(&blocker.join("child"))
            .expect_err("should fail");
        assert!(err.contains("failed to create dir"));
    }
}
