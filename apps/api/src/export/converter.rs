//! Office-suite PDF conversion. Runs `soffice --headless --convert-to pdf`
//! against a docx written into a scratch directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::export::ExportError;
use crate::storage::sanitize_name;

/// Command used when no install location is found.
pub const FALLBACK_COMMAND: &str = "libreoffice";

/// Usual install locations, checked in order.
pub const KNOWN_LOCATIONS: &[&str] = &[
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
    "/usr/bin/libreoffice",
    "/usr/bin/soffice",
    "/usr/local/bin/libreoffice",
    "/usr/local/bin/soffice",
    "/opt/libreoffice/program/soffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
];

#[derive(Debug, Clone)]
pub struct OfficeConverter {
    candidates: Vec<PathBuf>,
    command: PathBuf,
    timeout: Duration,
}

impl OfficeConverter {
    /// `candidates` are tried in order; `command` runs when none exists on disk.
    pub fn new(candidates: Vec<PathBuf>, command: PathBuf, timeout: Duration) -> Self {
        Self {
            candidates,
            command,
            timeout,
        }
    }

    /// An explicit path goes first, ahead of the known install locations.
    pub fn from_config(soffice_path: Option<PathBuf>, timeout: Duration) -> Self {
        let candidates = soffice_path
            .into_iter()
            .chain(KNOWN_LOCATIONS.iter().map(PathBuf::from))
            .collect();
        Self::new(candidates, PathBuf::from(FALLBACK_COMMAND), timeout)
    }

    /// The executable a conversion would run right now.
    pub fn resolve(&self) -> PathBuf {
        self.candidates
            .iter()
            .find(|candidate| candidate.is_file())
            .cloned()
            .unwrap_or_else(|| self.command.clone())
    }

    pub async fn docx_to_pdf(&self, docx: &[u8], display_name: &str) -> Result<Vec<u8>, ExportError> {
        let scratch = tempfile::Builder::new().prefix("sop-export-").tempdir()?;
        let result = self.convert_in(scratch.path(), docx, display_name).await;
        if let Err(e) = scratch.close() {
            warn!("Failed to remove conversion scratch directory: {e}");
        }
        result
    }

    async fn convert_in(
        &self,
        dir: &Path,
        docx: &[u8],
        display_name: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let stem = format!("SOP_{}", sanitize_name(display_name, "Unnamed"));
        let input = dir.join(format!("{stem}.docx"));
        let output = dir.join(format!("{stem}.pdf"));
        tokio::fs::write(&input, docx).await?;

        let program = self.resolve();
        debug!("Converting {} with {}", input.display(), program.display());

        let child = Command::new(&program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(dir)
            .arg(&input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ExportError::ConverterUnavailable(format!(
                    "failed to start {}: {e}",
                    program.display()
                ))
            })?;

        let finished = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExportError::Timeout(self.timeout.as_secs()))??;

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            return Err(ExportError::ConversionFailed(format!(
                "{} exited with {}: {}",
                program.display(),
                finished.status,
                stderr.trim()
            )));
        }

        let pdf = tokio::fs::read(&output).await.map_err(|e| {
            ExportError::ConversionFailed(format!("no PDF produced at {}: {e}", output.display()))
        })?;
        info!("Converted SOP to PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }
}
