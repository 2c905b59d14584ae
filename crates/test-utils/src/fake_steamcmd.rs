//! Stand-in `steamcmd` installations for orchestration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `executable` into `dir`.
///
/// The default body echoes each argument on its own line, which lets tests
/// assert on the argv `steamcmd` would have received.
#[cfg(unix)]
pub fn install_script(dir: &Path, executable: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(dir).expect("create fake install dir");
    let path = dir.join(executable);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake steamcmd");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake steamcmd");
    path
}

/// Body that prints every argument on its own line and exits 0.
pub const ECHO_ARGS: &str = r#"for arg in "$@"; do echo "$arg"; done"#;

/// Body that reports a failed build.
pub const FAIL_BUILD: &str = "echo 'ERROR! Failed to commit build'\nexit 5";
