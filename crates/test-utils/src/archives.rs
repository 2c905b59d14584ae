//! In-memory archive fixtures.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{EntryType, Header};
use zip::write::SimpleFileOptions;

/// One archive member.
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
    Symlink(&'a str, &'a str),
}

/// A zip archive holding `members` in order. Symlinks are not supported.
pub fn zip_bytes(members: &[Member<'_>]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for member in members {
        match *member {
            Member::File(name, content) => {
                writer.start_file(name, options).expect("start zip entry");
                writer.write_all(content).expect("write zip entry");
            }
            Member::Dir(name) => {
                writer.add_directory(name, options).expect("add zip directory");
            }
            Member::Symlink(..) => panic!("zip fixtures do not support symlinks"),
        }
    }

    writer.finish().expect("finish zip").into_inner()
}

/// Shorthand for a zip of regular text files.
pub fn zip_files(files: &[(&str, &str)]) -> Vec<u8> {
    let members: Vec<Member<'_>> = files
        .iter()
        .map(|(name, content)| Member::File(name, content.as_bytes()))
        .collect();
    zip_bytes(&members)
}

/// A gzip-compressed tar archive holding `members` in order.
///
/// Names are written into the header verbatim, so `..` and absolute names
/// can be used to build hostile archives.
pub fn tar_gz_bytes(members: &[Member<'_>]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for member in members {
        let mut header = Header::new_old();
        let (name, content, kind): (&str, &[u8], EntryType) = match *member {
            Member::File(name, content) => (name, content, EntryType::Regular),
            Member::Dir(name) => (name, &[], EntryType::Directory),
            Member::Symlink(name, target) => {
                header
                    .set_link_name(target)
                    .expect("set symlink target");
                (name, &[], EntryType::Symlink)
            }
        };
        write_raw_name(&mut header, name);
        header.set_entry_type(kind);
        header.set_size(content.len() as u64);
        header.set_mode(if kind == EntryType::Directory { 0o755 } else { 0o644 });
        header.set_mtime(0);
        header.set_cksum();
        builder.append(&header, content).expect("append tar entry");
    }

    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

/// Shorthand for a tar.gz of regular text files.
pub fn tar_gz_files(files: &[(&str, &str)]) -> Vec<u8> {
    let members: Vec<Member<'_>> = files
        .iter()
        .map(|(name, content)| Member::File(name, content.as_bytes()))
        .collect();
    tar_gz_bytes(&members)
}

// `Header::set_path` refuses `..`; fixtures need to be able to lie.
fn write_raw_name(header: &mut Header, name: &str) {
    let bytes = name.as_bytes();
    let slot = &mut header.as_old_mut().name;
    assert!(bytes.len() < slot.len(), "fixture name too long: {name}");
    slot.fill(0);
    slot[..bytes.len()].copy_from_slice(bytes);
}
