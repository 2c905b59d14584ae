// src/archive/guard.rs

//! Zip-slip protection: every archive entry is resolved against the
//! canonical destination root before anything is written.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::errors::{DeployError, Result};

/// Canonicalized extraction root.
#[derive(Debug, Clone)]
pub struct DestinationRoot {
    root: PathBuf,
}

impl DestinationRoot {
    /// Create `destination` if needed and remember its canonical form.
    pub fn prepare(destination: &Path) -> Result<Self> {
        fs::create_dir_all(destination)?;
        let root = fs::canonicalize(destination)?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve an entry name to its absolute output path.
    ///
    /// `..`, `.` and absolute components are applied lexically; the result
    /// must lie strictly below the root.
    pub fn resolve(&self, entry: &str) -> Result<PathBuf> {
        let candidate = normalize(&self.root.join(entry));
        if candidate != self.root && candidate.starts_with(&self.root) {
            Ok(candidate)
        } else {
            Err(traversal(entry))
        }
    }

    /// Whether `entry` names the root itself (e.g. a `./` directory entry).
    pub fn is_root(&self, entry: &str) -> bool {
        normalize(&self.root.join(entry)) == self.root
    }

    /// Create `dir` and its ancestors, then recheck it on disk so a
    /// pre-existing symlink cannot redirect the write.
    pub fn create_dir(&self, dir: &Path, entry: &str) -> Result<()> {
        fs::create_dir_all(dir)?;
        self.ensure_inside(dir, entry)
    }

    /// Create the ancestors of a file about to be written.
    pub fn create_parent(&self, file: &Path, entry: &str) -> Result<()> {
        match file.parent() {
            Some(parent) => self.create_dir(parent, entry),
            None => Err(traversal(entry)),
        }
    }

    /// Create (or truncate) the file for `entry` at `target`.
    ///
    /// A symlink already sitting at `target` is unlinked first so the write
    /// cannot follow it out of the root.
    pub fn create_file(&self, target: &Path, entry: &str) -> Result<File> {
        self.create_parent(target, entry)?;
        match fs::symlink_metadata(target) {
            Ok(meta) if meta.file_type().is_symlink() => fs::remove_file(target)?,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(File::create(target)?)
    }

    fn ensure_inside(&self, dir: &Path, entry: &str) -> Result<()> {
        if fs::canonicalize(dir)?.starts_with(&self.root) {
            Ok(())
        } else {
            Err(traversal(entry))
        }
    }
}

fn traversal(entry: &str) -> DeployError {
    DeployError::PathTraversal {
        entry: entry.to_string(),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
