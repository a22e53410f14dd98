//! Local filesystem backend.
//!
//! Exposes a real directory, read-only, as a provider.

use crate::path::{base_name, is_valid_path, ROOT};
use crate::traits::{DirEntry, EntryType, File, FileInfo, FileMode, Filesystem};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Local filesystem backend.
///
/// All operations are relative to `root`. For example, if `root` is
/// `/srv/site`, then `open("css/site.css")` opens `/srv/site/css/site.css`.
/// Paths that are not clean and relative are rejected, and symlinks that
/// resolve outside the root are refused.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Create a local filesystem rooted at the given directory.
    ///
    /// The directory is not checked until first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        if !is_valid_path(path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid path: {path:?}"),
            ));
        }

        let full = if path == ROOT {
            self.root.clone()
        } else {
            self.root.join(path)
        };

        // Symlinks may still point outside the root
        let canonical = full.canonicalize()?;
        let canonical_root = self.root.canonicalize()?;
        if !canonical.starts_with(&canonical_root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("path escapes root: {path}"),
            ));
        }

        Ok(full)
    }

    fn display_name(&self, path: &str) -> String {
        if path == ROOT {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| ROOT.to_string())
        } else {
            base_name(path).to_string()
        }
    }
}

fn entry_type(file_type: fs::FileType) -> EntryType {
    if file_type.is_dir() {
        EntryType::Directory
    } else if file_type.is_symlink() {
        EntryType::Symlink
    } else {
        EntryType::File
    }
}

#[cfg(unix)]
fn permissions(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permissions(metadata: &fs::Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, true) => 0o555,
        (true, false) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

/// Convert OS metadata; the metadata itself is kept as `sys`.
fn file_info(name: impl Into<String>, metadata: fs::Metadata) -> FileInfo {
    let kind = entry_type(metadata.file_type());
    let size = if kind == EntryType::Directory { 0 } else { metadata.len() };
    let mut info = FileInfo::new(name, size, FileMode::new(kind, permissions(&metadata)));
    if let Ok(modified) = metadata.modified() {
        info = info.with_modified(modified);
    }
    info.with_sys(Arc::new(metadata))
}

/// A directory entry read from disk; metadata is fetched on demand.
#[derive(Debug)]
struct LocalEntry {
    name: String,
    path: PathBuf,
    entry_type: EntryType,
}

impl DirEntry for LocalEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_type(&self) -> EntryType {
        self.entry_type
    }

    fn info(&self) -> io::Result<FileInfo> {
        let metadata = fs::symlink_metadata(&self.path)?;
        Ok(file_info(self.name.clone(), metadata))
    }
}

fn list(dir: &Path) -> io::Result<Vec<LocalEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push(LocalEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            entry_type: entry_type(entry.file_type()?),
        });
    }
    // Sort for consistent ordering
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Handle to an open local file or directory.
enum LocalFile {
    File {
        name: String,
        file: fs::File,
    },
    Directory {
        name: String,
        path: PathBuf,
        pending: Option<Vec<LocalEntry>>,
    },
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            LocalFile::File { file, .. } => file.read(buf),
            LocalFile::Directory { name, .. } => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {name}"),
            )),
        }
    }
}

impl<'a> File<'a> for LocalFile {
    fn stat(&self) -> io::Result<FileInfo> {
        match self {
            LocalFile::File { name, file } => Ok(file_info(name.clone(), file.metadata()?)),
            LocalFile::Directory { name, path, .. } => {
                Ok(file_info(name.clone(), fs::metadata(path)?))
            }
        }
    }

    fn read_dir(&mut self, limit: Option<usize>) -> io::Result<Vec<Box<dyn DirEntry + 'a>>> {
        match self {
            LocalFile::Directory { path, pending, .. } => {
                // Read lazily on first call, then hand out pages
                let mut entries = match pending.take() {
                    Some(entries) => entries,
                    None => list(path)?,
                };
                let n = limit.unwrap_or(entries.len()).min(entries.len());
                let page: Vec<Box<dyn DirEntry + 'a>> = entries
                    .drain(..n)
                    .map(|entry| Box::new(entry) as Box<dyn DirEntry + 'a>)
                    .collect();
                *pending = Some(entries);
                Ok(page)
            }
            LocalFile::File { name, .. } => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {name}"),
            )),
        }
    }
}

impl Filesystem for LocalFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn File<'_> + '_>> {
        let full_path = self.resolve(path)?;
        let name = self.display_name(path);
        let file = if fs::metadata(&full_path)?.is_dir() {
            LocalFile::Directory {
                name,
                path: full_path,
                pending: None,
            }
        } else {
            LocalFile::File {
                name,
                file: fs::File::open(&full_path)?,
            }
        };
        Ok(Box::new(file))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<Box<dyn DirEntry + '_>>> {
        let full_path = self.resolve(path)?;
        Ok(list(&full_path)?
            .into_iter()
            .map(|entry| Box::new(entry) as Box<dyn DirEntry + '_>)
            .collect())
    }

    fn stat(&self, path: &str) -> io::Result<FileInfo> {
        let full_path = self.resolve(path)?;
        Ok(file_info(self.display_name(path), fs::metadata(&full_path)?))
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        let full_path = self.resolve(path)?;
        fs::read(&full_path)
    }
}
