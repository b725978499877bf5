use super::types::{Anomaly, QueryAnalysis, SecurityAudit, SystemSnapshots};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const SECURITY_FILE: &str = "last_audit.json";
pub const PERFORMANCE_FILE: &str = "query_analysis.json";
pub const ANOMALIES_FILE: &str = "detected_anomalies.json";
pub const BACKUP_PLAN_FILE: &str = "backup_plan.json";
pub const BACKUP_SCRIPT_FILE: &str = "backup_script.rman";

/// Read-only access to the artifacts written by the analysis jobs.
///
/// Every accessor returns `None` when the artifact is missing or malformed.
#[async_trait::async_trait]
pub trait SnapshotReader: Send + Sync {
    async fn security(&self) -> Option<SecurityAudit>;
    async fn performance(&self) -> Option<Vec<QueryAnalysis>>;
    async fn anomalies(&self) -> Option<Vec<Anomaly>>;
    async fn backup_plan(&self) -> Option<Value>;
    async fn backup_script(&self) -> Option<String>;

    async fn read_all(&self) -> SystemSnapshots {
        let (security, performance, anomalies) =
            tokio::join!(self.security(), self.performance(), self.anomalies());
        SystemSnapshots {
            security,
            performance,
            anomalies,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSnapshotReader {
    data_dir: PathBuf,
}

impl FileSnapshotReader {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    async fn read_text(&self, file_name: &str) -> Option<String> {
        let path = self.data_dir.join(file_name);
        match fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                log::warn!("Failed to read snapshot {:?}: {}", path, error);
                None
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, file_name: &str) -> Option<T> {
        let content = self.read_text(file_name).await?;
        match serde_json::from_str(&content) {
            Ok(document) => Some(document),
            Err(error) => {
                log::warn!("Ignoring malformed snapshot {}: {}", file_name, error);
                None
            }
        }
    }

    /// A list snapshot keeps its readable entries and skips the rest.
    async fn read_entries<T: DeserializeOwned>(&self, file_name: &str) -> Option<Vec<T>> {
        let items: Vec<Value> = self.read_json(file_name).await?;
        let total = items.len();
        let entries: Vec<T> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if entries.len() < total {
            log::warn!(
                "Skipped {} unreadable entries in snapshot {}",
                total - entries.len(),
                file_name
            );
        }
        Some(entries)
    }
}

#[async_trait::async_trait]
impl SnapshotReader for FileSnapshotReader {
    async fn security(&self) -> Option<SecurityAudit> {
        self.read_json(SECURITY_FILE).await
    }

    async fn performance(&self) -> Option<Vec<QueryAnalysis>> {
        self.read_entries(PERFORMANCE_FILE).await
    }

    async fn anomalies(&self) -> Option<Vec<Anomaly>> {
        self.read_entries(ANOMALIES_FILE).await
    }

    async fn backup_plan(&self) -> Option<Value> {
        self.read_json(BACKUP_PLAN_FILE).await
    }

    async fn backup_script(&self) -> Option<String> {
        self.read_text(BACKUP_SCRIPT_FILE).await
    }
}
