//! File-based backend: one `MessagePack` file per namespace.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use ecscache_foundation::{Error, Result};
use tracing::debug;

use super::SnapshotBackend;

const EXTENSION: &str = "msgpack";

/// Stores each namespace as `<namespace>.msgpack` under a base directory.
///
/// Characters outside `[A-Za-z0-9_-]` are percent-escaped in file names, so
/// distinct namespaces always map to distinct files. Writes go to a `.tmp`
/// sibling that is flushed to disk and then renamed into place.
#[derive(Debug, Clone)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `base_dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(|e| io_error("create directory", &base_dir, &e))?;
        Ok(Self { base_dir })
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the snapshot file path for a namespace.
    #[must_use]
    pub fn snapshot_path(&self, namespace: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{EXTENSION}", escape(namespace)))
    }
}

fn io_error(action: &str, path: &Path, err: &io::Error) -> Error {
    Error::storage_unavailable(format!("failed to {action} '{}': {err}", path.display()))
}

/// Flushes the directory entry written by a rename.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!(dir = %dir.display(), error = %e, "failed to sync snapshot directory");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

fn escape(namespace: &str) -> String {
    let mut escaped = String::with_capacity(namespace.len());
    for byte in namespace.bytes() {
        if is_plain(byte) {
            escaped.push(char::from(byte));
        } else {
            let _ = write!(escaped, "%{byte:02X}");
        }
    }
    escaped
}

fn unescape(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = name.get(i + 1..i + 3)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            byte if is_plain(byte) => {
                out.push(byte);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}

impl SnapshotBackend for FileBackend {
    fn open(&self, namespace: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .map_err(|e| io_error("create directory", &self.base_dir, &e))?;
        debug!(namespace, dir = %self.base_dir.display(), "opened file namespace");
        Ok(())
    }

    fn read(&self, namespace: &str) -> Result<Option<Vec<u8>>> {
        let path = self.snapshot_path(namespace);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(namespace, bytes = bytes.len(), path = %path.display(), "read snapshot file");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, &e)),
        }
    }

    fn write(&self, namespace: &str, bytes: &[u8]) -> Result<()> {
        let path = self.snapshot_path(namespace);
        let temp_path = path.with_extension(format!("{EXTENSION}.tmp"));

        let mut file = File::create(&temp_path).map_err(|e| io_error("create", &temp_path, &e))?;
        file.write_all(bytes)
            .and_then(|()| file.sync_all())
            .map_err(|e| {
                let _ = fs::remove_file(&temp_path);
                io_error("write", &temp_path, &e)
            })?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            io_error("replace", &path, &e)
        })?;
        sync_dir(&self.base_dir);

        debug!(namespace, bytes = bytes.len(), path = %path.display(), "wrote snapshot file");
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<()> {
        let path = self.snapshot_path(namespace);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(namespace, path = %path.display(), "removed snapshot file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &path, &e)),
        }
    }

    fn namespaces(&self) -> Result<Vec<String>> {
        let entries =
            fs::read_dir(&self.base_dir).map_err(|e| io_error("list", &self.base_dir, &e))?;

        let suffix = format!(".{EXTENSION}");
        let mut namespaces = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list", &self.base_dir, &e))?;
            let path = entry.path();

            let namespace = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| name.strip_suffix(&suffix))
                .and_then(unescape);
            if let Some(namespace) = namespace {
                namespaces.push(namespace);
            }
        }

        namespaces.sort_unstable();
        Ok(namespaces)
    }
}
