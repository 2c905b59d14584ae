// src/files.rs

//! Recursive delete and copy for staging build content.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::Result;

/// Remove `path` and everything under it. A missing path is not an error.
pub fn recursive_delete(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    debug!(path = %path.display(), "deleted");
    Ok(())
}

/// Copy the tree rooted at `source` to `destination`, creating it as needed
/// and overwriting files that already exist. Returns the number of files
/// copied.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        files = copied,
        "tree copied"
    );
    Ok(copied)
}
