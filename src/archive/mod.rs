// src/archive/mod.rs

//! Streaming archive extraction with path-traversal protection.
//!
//! - [`zip_archive`] handles zip streams.
//! - [`tar_gz`] handles gzip-compressed tar streams.
//! - [`guard`] resolves entry names against the destination root and
//!   rejects anything that would land outside it.
//!
//! The archive kind is chosen by the caller (per platform); it is never
//! sniffed from the content.

use std::io::Read;
use std::path::Path;

use crate::errors::Result;

pub mod guard;
pub mod tar_gz;
pub mod zip_archive;

pub use guard::DestinationRoot;
pub use tar_gz::extract_tar_gz;
pub use zip_archive::extract_zip;

/// Archive format of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    /// Extract `reader` into `destination` using this format.
    pub fn extract<R: Read>(self, reader: R, destination: &Path) -> Result<()> {
        match self {
            ArchiveKind::Zip => extract_zip(reader, destination),
            ArchiveKind::TarGz => extract_tar_gz(reader, destination),
        }
    }
}
