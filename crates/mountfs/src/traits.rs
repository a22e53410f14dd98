//! Core filesystem traits and types.
//!
//! Providers implement [`Filesystem`]. Opening a path yields a [`File`]
//! handle; listing a directory yields [`DirEntry`] values whose metadata is
//! fetched lazily through [`DirEntry::info`].

use std::any::Any;
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;
use std::time::SystemTime;

/// Type of directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    Symlink,
}

/// Entry type plus Unix-style permission bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode {
    entry_type: EntryType,
    permissions: u32,
}

impl FileMode {
    /// Read-only directory.
    pub const DIR: FileMode = FileMode::new(EntryType::Directory, 0o555);
    /// Read-only regular file.
    pub const FILE: FileMode = FileMode::new(EntryType::File, 0o444);

    pub const fn new(entry_type: EntryType, permissions: u32) -> Self {
        Self {
            entry_type,
            permissions: permissions & 0o7777,
        }
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Permission bits (e.g. `0o644`).
    pub fn permissions(&self) -> u32 {
        self.permissions
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.entry_type {
            EntryType::File => '-',
            EntryType::Directory => 'd',
            EntryType::Symlink => 'l',
        };
        write!(f, "{kind}")?;
        for shift in [6, 3, 0] {
            let bits = (self.permissions >> shift) & 0o7;
            let r = if bits & 0o4 != 0 { 'r' } else { '-' };
            let w = if bits & 0o2 != 0 { 'w' } else { '-' };
            let x = if bits & 0o1 != 0 { 'x' } else { '-' };
            write!(f, "{r}{w}{x}")?;
        }
        Ok(())
    }
}

/// Metadata about a file or directory, as returned by `stat`.
#[derive(Clone)]
pub struct FileInfo {
    name: String,
    size: u64,
    mode: FileMode,
    modified: SystemTime,
    sys: Option<Arc<dyn Any + Send + Sync>>,
}

impl fmt::Debug for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInfo")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("mode", &self.mode)
            .field("modified", &self.modified)
            .field("sys", &self.sys.as_ref().map(|_| "..."))
            .finish()
    }
}

impl PartialEq for FileInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size == other.size
            && self.mode == other.mode
            && self.modified == other.modified
    }
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64, mode: FileMode) -> Self {
        Self {
            name: name.into(),
            size,
            mode,
            modified: SystemTime::UNIX_EPOCH,
            sys: None,
        }
    }

    /// A read-only regular file.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self::new(name, size, FileMode::FILE)
    }

    /// A read-only directory of size 0.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, 0, FileMode::DIR)
    }

    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = modified;
        self
    }

    /// Attach provider-specific data, retrievable through [`FileInfo::sys`].
    pub fn with_sys(mut self, sys: Arc<dyn Any + Send + Sync>) -> Self {
        self.sys = Some(sys);
        self
    }

    /// Base name of the file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes (0 for directories).
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn mod_time(&self) -> SystemTime {
        self.modified
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Provider-specific data, if any.
    pub fn sys(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.sys.as_deref()
    }
}

/// A directory entry returned by `read_dir`.
pub trait DirEntry: Send {
    /// Name of the entry (not full path).
    fn name(&self) -> &str;

    fn file_type(&self) -> EntryType;

    fn is_dir(&self) -> bool {
        self.file_type() == EntryType::Directory
    }

    /// Full metadata for the entry. May touch the underlying provider.
    fn info(&self) -> io::Result<FileInfo>;
}

impl fmt::Debug for dyn DirEntry + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirEntry")
            .field("name", &self.name())
            .field("file_type", &self.file_type())
            .finish()
    }
}

/// A `DirEntry` backed by metadata that is already known.
#[derive(Debug, Clone)]
pub struct InfoEntry(FileInfo);

impl From<FileInfo> for InfoEntry {
    fn from(info: FileInfo) -> Self {
        Self(info)
    }
}

impl DirEntry for InfoEntry {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn file_type(&self) -> EntryType {
        self.0.mode().entry_type()
    }

    fn info(&self) -> io::Result<FileInfo> {
        Ok(self.0.clone())
    }
}

/// An open file or directory.
///
/// Handles belong to the caller. Dropping a handle releases it; `close`
/// exists for providers that want to report errors on release.
///
/// `'a` is the lifetime of whatever the handle borrows from its filesystem.
/// Entries listed through the handle may borrow the same data, so they can
/// outlive the handle but not the filesystem.
pub trait File<'a>: Read + Send {
    fn stat(&self) -> io::Result<FileInfo>;

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Read directory entries from a directory handle.
    ///
    /// `None` returns all remaining entries. `Some(n)` returns at most `n`
    /// and advances past them; an exhausted directory returns an empty list.
    fn read_dir(&mut self, limit: Option<usize>) -> io::Result<Vec<Box<dyn DirEntry + 'a>>> {
        let _ = limit;
        Err(io::Error::new(io::ErrorKind::NotADirectory, "not a directory"))
    }
}

/// Abstract read-only filesystem interface.
///
/// Paths are `/`-separated and relative to the filesystem root; `"."` names
/// the root itself.
pub trait Filesystem: Send + Sync {
    /// Open a file or directory.
    fn open(&self, path: &str) -> io::Result<Box<dyn File<'_> + '_>>;

    /// List entries in a directory, sorted by name.
    ///
    /// Entries may borrow the filesystem. The default opens `path` and reads
    /// the handle's entries.
    fn read_dir(&self, path: &str) -> io::Result<Vec<Box<dyn DirEntry + '_>>> {
        let mut file = self.open(path)?;
        let mut entries = file.read_dir(None)?;
        file.close()?;
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }

    /// Get metadata for a file or directory.
    fn stat(&self, path: &str) -> io::Result<FileInfo> {
        let mut file = self.open(path)?;
        let info = file.stat()?;
        file.close()?;
        Ok(info)
    }

    /// Read the entire contents of a file.
    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        let mut file = self.open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        file.close()?;
        Ok(data)
    }
}

impl<T: Filesystem + ?Sized> Filesystem for Arc<T> {
    fn open(&self, path: &str) -> io::Result<Box<dyn File<'_> + '_>> {
        (**self).open(path)
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<Box<dyn DirEntry + '_>>> {
        (**self).read_dir(path)
    }

    fn stat(&self, path: &str) -> io::Result<FileInfo> {
        (**self).stat(path)
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        (**self).read_file(path)
    }
}

/// Take the next page of a listing, advancing `cursor`.
pub(crate) fn paginate<T>(items: Vec<T>, cursor: &mut usize, limit: Option<usize>) -> Vec<T> {
    let remaining = items.into_iter().skip(*cursor);
    let page: Vec<T> = match limit {
        Some(n) => remaining.take(n).collect(),
        None => remaining.collect(),
    };
    *cursor += page.len();
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(FileMode::DIR.to_string(), "dr-xr-xr-x");
        assert_eq!(FileMode::FILE.to_string(), "-r--r--r--");
        assert_eq!(FileMode::new(EntryType::Symlink, 0o777).to_string(), "lrwxrwxrwx");
    }

    #[test]
    fn test_info_entry() {
        let entry = InfoEntry::from(FileInfo::file("a.txt", 3));
        assert_eq!(entry.name(), "a.txt");
        assert!(!entry.is_dir());
        assert_eq!(entry.info().unwrap().size(), 3);

        let dir = InfoEntry::from(FileInfo::directory("sub"));
        assert!(dir.is_dir());
        assert_eq!(dir.file_type(), EntryType::Directory);
    }

    #[test]
    fn test_sys_escape_hatch() {
        let info = FileInfo::file("a", 1);
        assert!(info.sys().is_none());

        let info = info.with_sys(Arc::new(42u32));
        let sys = info.sys().and_then(|s| s.downcast_ref::<u32>());
        assert_eq!(sys, Some(&42));
    }

    #[test]
    fn test_paginate() {
        let mut cursor = 0;
        assert_eq!(paginate(vec![1, 2, 3], &mut cursor, Some(2)), vec![1, 2]);
        assert_eq!(paginate(vec![1, 2, 3], &mut cursor, Some(2)), vec![3]);
        assert!(paginate(vec![1, 2, 3], &mut cursor, Some(2)).is_empty());

        let mut cursor = 1;
        assert_eq!(paginate(vec![1, 2, 3], &mut cursor, None), vec![2, 3]);
        assert_eq!(cursor, 3);
    }
}
