//! The synthetic root of a composite.
//!
//! The root is never stored. Listing it walks the registry and produces one
//! directory entry per mount, sorted by name. Entries and handles borrow the
//! registry, so it cannot change while any of them is alive.

use crate::options::MountFsOptions;
use crate::path::ROOT;
use crate::registry::MountRegistry;
use crate::traits::{paginate, DirEntry, EntryType, File, FileInfo, FileMode, Filesystem};
use std::fmt;
use std::io::{self, Read};

/// A mount, presented as a directory entry of the root.
///
/// Always reports itself as a directory, whatever the provider's root
/// actually is. `info` opens the provider's root and returns its `stat`.
pub struct MountEntry<'a> {
    name: &'a str,
    fs: &'a dyn Filesystem,
}

impl fmt::Debug for MountEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<'a> MountEntry<'a> {
    pub fn new(name: &'a str, fs: &'a dyn Filesystem) -> Self {
        Self { name, fs }
    }
}

impl DirEntry for MountEntry<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn file_type(&self) -> EntryType {
        EntryType::Directory
    }

    fn is_dir(&self) -> bool {
        true
    }

    fn info(&self) -> io::Result<FileInfo> {
        let mut file = self.fs.open(ROOT)?;
        let info = file.stat()?;
        file.close()?;
        Ok(info)
    }
}

/// List the root: one entry per registered mount, ascending by name.
pub(crate) fn list_root(registry: &MountRegistry) -> Vec<Box<dyn DirEntry + '_>> {
    let mut entries: Vec<MountEntry<'_>> = registry
        .iter()
        .map(|(name, fs)| MountEntry::new(name, fs))
        .collect();
    entries.sort_by(|a, b| a.name.cmp(b.name));
    entries
        .into_iter()
        .map(|entry| Box::new(entry) as Box<dyn DirEntry + '_>)
        .collect()
}

/// Metadata reported for the root itself.
pub(crate) fn root_info(options: &MountFsOptions) -> FileInfo {
    FileInfo::new(options.root_name.clone(), 0, FileMode::DIR)
        .with_modified(options.root_time.resolve())
}

/// Handle returned by opening `"."` on a composite.
pub(crate) struct RootFile<'a> {
    registry: &'a MountRegistry,
    options: &'a MountFsOptions,
    cursor: usize,
}

impl<'a> RootFile<'a> {
    pub(crate) fn new(registry: &'a MountRegistry, options: &'a MountFsOptions) -> Self {
        Self {
            registry,
            options,
            cursor: 0,
        }
    }
}

impl Read for RootFile<'_> {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

impl<'a> File<'a> for RootFile<'a> {
    fn stat(&self) -> io::Result<FileInfo> {
        Ok(root_info(self.options))
    }

    fn read_dir(&mut self, limit: Option<usize>) -> io::Result<Vec<Box<dyn DirEntry + 'a>>> {
        Ok(paginate(list_root(self.registry), &mut self.cursor, limit))
    }
}
