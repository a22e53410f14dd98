//! Recursive directory listing over any [`Filesystem`].
//!
//! Walking a [`crate::MountFs`] from `"."` descends through the synthetic
//! root into every mount, so one call lists the whole union.

use crate::path::join;
use crate::traits::{EntryType, Filesystem};
use std::io;

/// Types of entries to include in walk results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTypes {
    /// Include regular files and symlinks.
    pub files: bool,
    /// Include directories.
    pub dirs: bool,
}

impl Default for EntryTypes {
    fn default() -> Self {
        Self::all()
    }
}

impl EntryTypes {
    /// Include only files.
    pub fn files_only() -> Self {
        Self {
            files: true,
            dirs: false,
        }
    }

    /// Include only directories.
    pub fn dirs_only() -> Self {
        Self {
            files: false,
            dirs: true,
        }
    }

    /// Include both files and directories.
    pub fn all() -> Self {
        Self {
            files: true,
            dirs: true,
        }
    }

    fn includes(&self, entry_type: EntryType) -> bool {
        match entry_type {
            EntryType::Directory => self.dirs,
            EntryType::File | EntryType::Symlink => self.files,
        }
    }
}

/// Options for walking.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited). Entries directly under
    /// the starting directory are at depth 1.
    pub max_depth: Option<usize>,
    /// Types of entries to include.
    pub entry_types: EntryTypes,
}

impl WalkOptions {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_entry_types(mut self, entry_types: EntryTypes) -> Self {
        self.entry_types = entry_types;
        self
    }
}

/// One entry found by [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path from the filesystem root, usable with `open`.
    pub path: String,
    pub entry_type: EntryType,
    pub depth: usize,
}

/// Walk `root` depth-first, in name order within each directory.
///
/// Directories are reported before their contents. Symlinks are reported
/// but never followed. The first error from the filesystem ends the walk.
pub fn walk<F: Filesystem + ?Sized>(
    fs: &F,
    root: &str,
    options: &WalkOptions,
) -> io::Result<Vec<WalkEntry>> {
    let mut out = Vec::new();
    walk_dir(fs, root, 1, options, &mut out)?;
    Ok(out)
}

fn walk_dir<F: Filesystem + ?Sized>(
    fs: &F,
    dir: &str,
    depth: usize,
    options: &WalkOptions,
    out: &mut Vec<WalkEntry>,
) -> io::Result<()> {
    for entry in fs.read_dir(dir)? {
        let path = join(dir, entry.name());
        let entry_type = entry.file_type();

        if options.entry_types.includes(entry_type) {
            out.push(WalkEntry {
                path: path.clone(),
                entry_type,
                depth,
            });
        }

        let descend = options.max_depth.is_none_or(|max| depth < max);
        if entry.is_dir() && descend {
            walk_dir(fs, &path, depth + 1, options, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFs;

    fn sample() -> MemoryFs {
        MemoryFs::new()
            .with_file("a.txt", "a")
            .with_file("docs/guide.md", "g")
            .with_file("docs/api/index.md", "i")
            .with_dir("empty")
    }

    fn paths(entries: &[WalkEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_walk_all() {
        let entries = walk(&sample(), ".", &WalkOptions::default()).unwrap();
        assert_eq!(
            paths(&entries),
            vec!["a.txt", "docs", "docs/api", "docs/api/index.md", "docs/guide.md", "empty"]
        );
        assert_eq!(entries[3].depth, 3);
    }

    #[test]
    fn test_walk_files_only() {
        let options = WalkOptions::default().with_entry_types(EntryTypes::files_only());
        let entries = walk(&sample(), ".", &options).unwrap();
        assert_eq!(paths(&entries), vec!["a.txt", "docs/api/index.md", "docs/guide.md"]);
    }

    #[test]
    fn test_walk_dirs_only_with_depth() {
        let options = WalkOptions::default()
            .with_entry_types(EntryTypes::dirs_only())
            .with_max_depth(1);
        let entries = walk(&sample(), ".", &options).unwrap();
        assert_eq!(paths(&entries), vec!["docs", "empty"]);
    }

    #[test]
    fn test_walk_subtree() {
        let entries = walk(&sample(), "docs", &WalkOptions::default()).unwrap();
        assert_eq!(paths(&entries), vec!["docs/api", "docs/api/index.md", "docs/guide.md"]);
        assert_eq!(entries[0].depth, 1);
    }

    #[test]
    fn test_walk_error_propagates() {
        let err = walk(&sample(), "missing", &WalkOptions::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
