#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Stand-in for the Bandizip command line. An "archive" is a text file; a
/// line `password=<pw>` marks it encrypted. A successful run drops
/// `<name>.extracted` into the `-o:` directory.
#[cfg(unix)]
const FAKE_BANDIZIP: &str = r#"#!/bin/sh
dest=""
archive=""
pw=""
for arg in "$@"; do
  case "$arg" in
    x|-y) ;;
    -o:*) dest="${arg#-o:}" ;;
    -p:*) pw="${arg#-p:}" ;;
    *) archive="$arg" ;;
  esac
done
required=$(sed -n 's/^password=//p' "$archive")
if [ -n "$required" ] && [ "$required" != "$pw" ]; then
  echo "wrong password for $archive" >&2
  exit 11
fi
mkdir -p "$dest"
touch "$dest/$(basename "$archive").extracted"
exit 0
"#;

/// Writes the fake engine once per test binary and returns its path.
///
/// Written before any test spawns a process, so no child can inherit the
/// script's write handle.
#[cfg(unix)]
pub fn fake_engine(name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    use std::sync::OnceLock;

    static ENGINE: OnceLock<PathBuf> = OnceLock::new();
    ENGINE
        .get_or_init(|| {
            let path = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
            fs::write(&path, FAKE_BANDIZIP).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        })
        .clone()
}

pub fn plain_archive(path: &Path) {
    fs::write(path, "plain archive\n").unwrap();
}

pub fn locked_archive(path: &Path, password: &str) {
    fs::write(path, format!("password={}\n", password)).unwrap();
}
