// src/archive/zip_archive.rs

use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, info};
use zip::read::read_zipfile_from_stream;

use crate::errors::Result;

use super::guard::DestinationRoot;

/// Extract a zip stream into `destination`, one local entry at a time.
///
/// Directory entries are created with their ancestors; file entries
/// overwrite whatever is already at their path. The first entry that
/// resolves outside `destination` aborts the extraction with
/// [`crate::errors::DeployError::PathTraversal`]. Entries written before a
/// failure are left in place.
pub fn extract_zip<R: Read>(mut reader: R, destination: &Path) -> Result<()> {
    let root = DestinationRoot::prepare(destination)?;
    info!(destination = %root.path().display(), "extracting zip archive");

    let mut files = 0usize;
    while let Some(mut entry) = read_zipfile_from_stream(&mut reader)? {
        let name = entry.name().to_string();

        if entry.is_dir() {
            if root.is_root(&name) {
                continue;
            }
            let dir = root.resolve(&name)?;
            root.create_dir(&dir, &name)?;
            debug!(entry = %name, "created directory");
            continue;
        }

        let target = root.resolve(&name)?;
        let mut out = root.create_file(&target, &name)?;
        let bytes = io::copy(&mut entry, &mut out)?;
        debug!(entry = %name, bytes, "extracted file");
        files += 1;
    }

    info!(destination = %root.path().display(), files, "zip archive extracted");
    Ok(())
}
