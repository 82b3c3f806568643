use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;
use tokio::fs;

use crate::error::{ExtractionError, Result};
use crate::report::ExtractionReport;

/// Destination for finished reports, keyed by brand identifier.
///
/// Extraction never persists on its own; callers hand reports to a store when they want to.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save(&self, brand_id: &str, report: &ExtractionReport) -> Result<()>;

    async fn load(&self, brand_id: &str) -> Result<Option<ExtractionReport>>;
}

/// Stores each report as pretty-printed JSON at `<dir>/<brand_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    dir: PathBuf,
}

impl JsonDirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn report_path(&self, brand_id: &str) -> Result<PathBuf> {
        let valid = !brand_id.is_empty()
            && brand_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ExtractionError::InvalidRequest(format!(
                "brand id '{}' must be non-empty and contain only letters, digits, '-' or '_'",
                brand_id
            )));
        }
        Ok(self.dir.join(format!("{}.json", brand_id)))
    }
}

#[async_trait]
impl ReportStore for JsonDirectoryStore {
    async fn save(&self, brand_id: &str, report: &ExtractionReport) -> Result<()> {
        let path = self.report_path(brand_id)?;
        fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json).await?;
        info!("Saved brand report for '{}' to {}", brand_id, path.display());
        Ok(())
    }

    async fn load(&self, brand_id: &str) -> Result<Option<ExtractionReport>> {
        let path = self.report_path(brand_id)?;
        match fs::read_to_string(&path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
