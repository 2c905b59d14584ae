// src/download.rs

//! Where a `steamcmd` distribution comes from, and how it reaches the
//! extractor.
//!
//! The archive is never staged on disk: the HTTP body (or local file) is
//! handed to the extractor as a plain `Read`.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use tracing::info;

use crate::archive::ArchiveKind;
use crate::errors::{DeployError, Result};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10 * 60);

static HTTP_AGENT: LazyLock<ureq::Agent> = LazyLock::new(|| {
    ureq::Agent::config_builder()
        .timeout_global(Some(DOWNLOAD_TIMEOUT))
        .build()
        .new_agent()
});

/// An archive location: a remote URL or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// `http(s)://` becomes a URL, `file://` and anything else a local path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Url(raw.to_string())
        } else if let Some(path) = raw.strip_prefix("file://") {
            Source::File(PathBuf::from(path))
        } else {
            Source::File(PathBuf::from(raw))
        }
    }

    /// Open the archive as a blocking byte stream.
    pub fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            Source::Url(url) => {
                let response = HTTP_AGENT.get(url).call().map_err(|e| DeployError::Download {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
                Ok(Box::new(response.into_body().into_reader()))
            }
            Source::File(path) => Ok(Box::new(File::open(path)?)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Stream `source` through the extractor for `kind` into `destination`.
///
/// Blocking; see [`fetch_and_extract_async`] for use on the runtime.
pub fn fetch_and_extract(source: &Source, kind: ArchiveKind, destination: &Path) -> Result<()> {
    info!(source = %source, ?kind, destination = %destination.display(), "installing archive");
    let reader = source.open()?;
    kind.extract(reader, destination)
}

/// [`fetch_and_extract`] on the blocking thread pool.
pub async fn fetch_and_extract_async(
    source: Source,
    kind: ArchiveKind,
    destination: PathBuf,
) -> Result<()> {
    tokio::task::spawn_blocking(move || fetch_and_extract(&source, kind, &destination))
        .await
        .map_err(anyhow::Error::from)?
}
