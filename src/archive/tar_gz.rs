// src/archive/tar_gz.rs

use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use crate::errors::Result;

use super::guard::DestinationRoot;

/// Extract a gzip-compressed tar stream into `destination`.
///
/// Only regular files are materialized; directories come into existence as
/// ancestors of the files inside them. Links and other special entries are
/// skipped.
pub fn extract_tar_gz<R: Read>(reader: R, destination: &Path) -> Result<()> {
    let root = DestinationRoot::prepare(destination)?;
    info!(destination = %root.path().display(), "extracting tar.gz archive");

    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut files = 0usize;

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = entry.path()?.to_string_lossy().into_owned();
        let target = root.resolve(&name)?;
        let mut out = root.create_file(&target, &name)?;
        let bytes = io::copy(&mut entry, &mut out)?;
        debug!(entry = %name, bytes, "extracted file");
        files += 1;
    }

    info!(destination = %root.path().display(), files, "tar.gz archive extracted");
    Ok(())
}
