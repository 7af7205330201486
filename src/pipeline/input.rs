//! Input resolution: turn what the user typed or uploaded into a [`Source`].
//!
//! Validation happens here, before the pipeline runs: a malformed URL or a
//! missing file is a [`SummaryError`] and never reaches the fetcher. The
//! module also owns the two scoped temporary-file holders used by the
//! pipeline, [`ScopedUpload`] for uploaded PDF bytes and [`DownloadedPdf`]
//! for PDF URLs. Both delete their file when dropped, on success, on error
//! and on unwind alike.

use crate::error::{StepError, SummaryError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};
use url::Url;

/// A validated pipeline input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Absolute HTTP/HTTPS URL.
    Url(Url),
    /// Local PDF file.
    Pdf(PathBuf),
}

impl Source {
    /// Identifier recorded as the pipeline state's `input`.
    pub fn label(&self) -> String {
        match self {
            Source::Url(url) => url.to_string(),
            Source::Pdf(path) => path.display().to_string(),
        }
    }
}

/// Check if the input string carries an HTTP or HTTPS scheme.
pub fn is_url(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Prefix `https://` onto inputs without a scheme, e.g. a bare domain.
pub fn normalize_url(input: &str) -> String {
    let input = input.trim();
    if is_url(input) {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

/// Parse a well-formed absolute HTTP/HTTPS URL.
pub fn parse_url(input: &str) -> Result<Url, SummaryError> {
    let invalid = |reason: String| SummaryError::InvalidUrl {
        input: input.to_string(),
        reason,
    };

    let url = Url::parse(input.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Does the URL point at a PDF rather than a web page?
pub fn is_pdf_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Resolve free-form CLI input: a URL, a bare domain, or a local PDF path.
///
/// Anything that exists on disk or ends in `.pdf` (without a scheme) is
/// treated as a file; everything else is normalised to an HTTPS URL.
pub fn resolve_input(input: &str) -> Result<Source, SummaryError> {
    let input = input.trim();
    if is_url(input) {
        return parse_url(input).map(Source::Url);
    }
    if Path::new(input).exists() || input.to_ascii_lowercase().ends_with(".pdf") {
        return resolve_local(input).map(Source::Pdf);
    }
    parse_url(&normalize_url(input)).map(Source::Url)
}

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_local(path_str: &str) -> Result<PathBuf, SummaryError> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(SummaryError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            let read = f.read(&mut magic).unwrap_or(0);
            if read < magic.len() || &magic != b"%PDF" {
                return Err(SummaryError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SummaryError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(SummaryError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Uploaded PDF bytes held in a temporary `.pdf` file.
///
/// The file is removed when this value is dropped.
#[derive(Debug)]
pub struct ScopedUpload {
    file: NamedTempFile,
}

impl ScopedUpload {
    /// Write `bytes` to a fresh temporary file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SummaryError> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile()
            .map_err(|source| SummaryError::UploadFailed { source })?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|source| SummaryError::UploadFailed { source })?;
        debug!("Upload saved to {} ({} bytes)", file.path().display(), bytes.len());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// A PDF URL downloaded into a temporary directory.
///
/// The `TempDir` is kept alive until the fetch step is done with the file.
#[derive(Debug)]
pub struct DownloadedPdf {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl DownloadedPdf {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Download a PDF URL to a temporary directory.
pub async fn download_pdf(url: &Url, timeout_secs: u64) -> Result<DownloadedPdf, StepError> {
    info!("Downloading PDF from: {}", url);
    let failed = |reason: String| StepError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            StepError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        return Err(failed("response is not a PDF".to_string()));
    }

    let temp_dir = TempDir::new().map_err(|e| failed(format!("temp dir: {e}")))?;
    let path = temp_dir.path().join(extract_filename(url));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| failed(format!("Failed to write temp file: {e}")))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), path.display());
    Ok(DownloadedPdf {
        path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of the URL, or `downloaded.pdf`.
fn extract_filename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| !last.is_empty() && last.contains('.'))
        .map(str::to_string)
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}
