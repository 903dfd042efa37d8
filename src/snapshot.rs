use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use crate::k8s;
use crate::model::{ClusterSnapshot, ClusterSummary};

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            modified: None,
        }
    }

    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records the mtime before parsing, so a broken file is not retried
    /// until it changes again.
    pub fn load(&mut self) -> Result<ClusterSnapshot> {
        self.modified = modified_at(&self.path);
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot {}", self.path.display()))?;
        let snapshot = parse_snapshot(&raw)
            .with_context(|| format!("failed to parse snapshot {}", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            pods = snapshot.pods.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn reload_if_changed(&mut self) -> Result<Option<ClusterSnapshot>> {
        let modified = modified_at(&self.path);
        if modified == self.modified {
            return Ok(None);
        }
        self.load().map(Some)
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|meta| meta.modified().ok())
}

pub fn parse_snapshot(raw: &str) -> Result<ClusterSnapshot> {
    if raw.trim().is_empty() {
        return Ok(ClusterSnapshot::default());
    }
    let document: Value = serde_yaml::from_str(raw).context("snapshot is not valid YAML/JSON")?;
    if k8s::is_list_document(&document) {
        return k8s::snapshot_from_list(&document);
    }

    let mut snapshot: ClusterSnapshot =
        serde_json::from_value(document).context("snapshot does not match the expected layout")?;
    if snapshot.super_pods.is_empty() {
        snapshot.super_pods = k8s::build_super_pods(&snapshot.nodes);
    }
    if snapshot.summary == ClusterSummary::default() && !snapshot.is_empty() {
        snapshot.summary = k8s::summarize(&snapshot);
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::{SnapshotSource, parse_snapshot};
    use std::fs;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "kubeglance-{}-{name}",
            std::process::id()
        ));
        fs::write(&path, contents).expect("write scratch snapshot");
        path
    }

    #[test]
    fn native_snapshot_fills_in_derived_fields() {
        let raw = r#"
nodes:
  - name: npu-a
    status: Ready
    npu_capacity: 8
    super_pod_id: sp-1
pods:
  - name: p1
    namespace: ml
    phase: Pending
"#;
        let snapshot = parse_snapshot(raw).expect("snapshot parses");
        assert_eq!(snapshot.super_pods[0].id, "sp-1");
        assert_eq!(snapshot.summary.nodes_ready, 1);
        assert_eq!(snapshot.summary.pods_pending, 1);
        assert_eq!(snapshot.summary.warnings, 1);
    }

    #[test]
    fn explicit_summary_is_kept() {
        let raw = "summary:\n  nodes_total: 9\nnodes:\n  - name: n1\n";
        let snapshot = parse_snapshot(raw).expect("snapshot parses");
        assert_eq!(snapshot.summary.nodes_total, 9);
    }

    #[test]
    fn json_and_empty_documents_parse() {
        let snapshot = parse_snapshot(r#"{"pods":[{"name":"p","namespace":"ns"}]}"#)
            .expect("json parses");
        assert_eq!(snapshot.pods[0].name, "p");
        assert!(parse_snapshot("   \n").expect("empty parses").is_empty());
    }

    #[test]
    fn malformed_document_is_an_error() {
        let error = parse_snapshot("nodes: 3\n").expect_err("layout mismatch");
        assert!(error.to_string().contains("expected layout"));
    }

    #[test]
    fn reload_only_reports_changes() {
        let path = scratch_file("reload.yaml", "nodes:\n  - name: n1\n");
        let mut source = SnapshotSource::new(&path);
        assert_eq!(source.label(), path.file_name().unwrap().to_string_lossy());

        let first = source.reload_if_changed().expect("first load");
        assert_eq!(first.map(|snapshot| snapshot.nodes.len()), Some(1));
        assert!(source.reload_if_changed().expect("unchanged").is_none());

        fs::remove_file(&path).expect("cleanup");
        assert!(source.reload_if_changed().is_err());
        assert!(source.reload_if_changed().expect("still missing").is_none());
    }

    #[test]
    fn broken_snapshot_is_not_reread_until_edited() {
        let path = scratch_file("broken.yaml", "nodes: 3\n");
        let mut source = SnapshotSource::new(&path);

        assert!(source.reload_if_changed().is_err());
        assert!(source.reload_if_changed().expect("unchanged").is_none());
        assert!(source.load().is_err());

        fs::remove_file(&path).expect("cleanup");
    }
}
