use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::generation::assembler::SectionResult;
use crate::models::UserData;

/// Filename timestamp, second granularity.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Serialize)]
struct SavedSop<'a> {
    complete_sop: &'a str,
    sections: BTreeMap<&'a str, &'a str>,
    timestamp: &'a str,
}

/// Append-only flat-file store for submitted answers and generated SOPs.
/// Nothing is ever read back.
#[derive(Debug, Clone)]
pub struct SopStore {
    data_dir: PathBuf,
}

impl SopStore {
    /// Creates the data directory if it does not exist yet.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        info!("SOP store ready at {}", data_dir.display());
        Ok(Self { data_dir })
    }

    /// Writes `user_data_<name>_<ts>.json` with the raw form fields.
    pub async fn save_user_data(&self, user: &UserData) -> Result<PathBuf> {
        let path = self.path_for("user_data", &user.display_name());
        self.write_json(&path, user).await?;
        Ok(path)
    }

    /// Writes `sop_<name>_<ts>.json` with the document and per-section bodies.
    pub async fn save_generated_sop(
        &self,
        name: &str,
        complete_sop: &str,
        sections: &[SectionResult],
    ) -> Result<PathBuf> {
        let timestamp = timestamp();
        let record = SavedSop {
            complete_sop,
            sections: sections
                .iter()
                .map(|s| (s.key.as_str(), s.body.as_str()))
                .collect(),
            timestamp: &timestamp,
        };
        let path = self.path_for("sop", name);
        self.write_json(&path, &record).await?;
        Ok(path)
    }

    fn path_for(&self, prefix: &str, name: &str) -> PathBuf {
        self.data_dir.join(format!(
            "{prefix}_{}_{}.json",
            sanitize_name(name, "unnamed"),
            timestamp()
        ))
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value).context("Failed to serialize record")?;
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved {}", path.display());
        Ok(())
    }
}

pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Filename-safe form of a display name: whitespace becomes `_`, anything other
/// than ASCII alphanumerics, `-` and `_` is dropped.
pub fn sanitize_name(name: &str, default: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        default.to_string()
    } else {
        cleaned
    }
}
