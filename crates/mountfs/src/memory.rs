//! In-memory read-only filesystem.
//!
//! Built up front from `(path, bytes)` pairs, then mounted. Handy for
//! embedded assets and for tests.

use crate::path::{base_name, is_valid_path, parent, ROOT, SEPARATOR};
use crate::traits::{DirEntry, File, FileInfo, Filesystem, InfoEntry};
use std::collections::BTreeMap;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

/// Entry in the memory filesystem.
#[derive(Debug, Clone)]
enum Node {
    File(Arc<[u8]>),
    Directory,
}

/// In-memory filesystem.
///
/// Parent directories are created implicitly. Once mounted the contents are
/// fixed; there is no write path. Every node reports the Unix epoch as its
/// modification time, so two filesystems built the same way stat the same.
#[derive(Debug, Clone)]
pub struct MemoryFs {
    nodes: BTreeMap<String, Node>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create a new filesystem containing only its root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        // Root directory always exists
        nodes.insert(ROOT.to_string(), Node::Directory);
        Self { nodes }
    }

    /// Builder form of [`MemoryFs::add_file`].
    pub fn with_file(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, data);
        self
    }

    /// Builder form of [`MemoryFs::add_dir`].
    pub fn with_dir(mut self, path: &str) -> Self {
        self.add_dir(path);
        self
    }

    /// Add a file, creating parent directories as needed.
    ///
    /// Leading, trailing and repeated slashes and `.` segments are ignored.
    /// A file replaces whatever was at its path.
    pub fn add_file(&mut self, path: &str, data: impl Into<Vec<u8>>) {
        let path = Self::normalize(path);
        if path == ROOT {
            return;
        }
        let data: Vec<u8> = data.into();
        self.ensure_parents(&path);
        self.nodes.insert(path, Node::File(Arc::from(data)));
    }

    /// Add a directory, creating parent directories as needed.
    pub fn add_dir(&mut self, path: &str) {
        let path = Self::normalize(path);
        self.ensure_parents(&path);
        self.nodes.entry(path).or_insert(Node::Directory);
    }

    /// Normalize a path: drop empty and `.` segments.
    fn normalize(path: &str) -> String {
        let segments: Vec<&str> = path
            .split(SEPARATOR)
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.is_empty() {
            ROOT.to_string()
        } else {
            segments.join("/")
        }
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut dir = parent(path);
        while dir != ROOT {
            self.nodes.insert(dir.to_string(), Node::Directory);
            dir = parent(dir);
        }
    }

    fn node(&self, path: &str) -> io::Result<&Node> {
        if !is_valid_path(path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid path: {path:?}"),
            ));
        }
        self.nodes.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("not found: {path}"))
        })
    }

    fn info(path: &str, node: &Node) -> FileInfo {
        match node {
            Node::File(data) => FileInfo::file(base_name(path), data.len() as u64),
            Node::Directory => FileInfo::directory(base_name(path)),
        }
    }

    /// Direct children of a directory, sorted by name.
    fn children(&self, dir: &str) -> Vec<InfoEntry> {
        let mut entries: Vec<InfoEntry> = self
            .nodes
            .iter()
            .filter(|(path, _)| path.as_str() != ROOT && parent(path) == dir)
            .map(|(path, node)| InfoEntry::from(Self::info(path, node)))
            .collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        entries
    }
}

/// Handle to an open memory file or directory.
enum MemoryFile {
    File {
        info: FileInfo,
        data: Cursor<Arc<[u8]>>,
    },
    Directory {
        info: FileInfo,
        entries: Vec<InfoEntry>,
    },
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MemoryFile::File { data, .. } => data.read(buf),
            MemoryFile::Directory { info, .. } => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {}", info.name()),
            )),
        }
    }
}

impl<'a> File<'a> for MemoryFile {
    fn stat(&self) -> io::Result<FileInfo> {
        match self {
            MemoryFile::File { info, .. } | MemoryFile::Directory { info, .. } => Ok(info.clone()),
        }
    }

    fn read_dir(&mut self, limit: Option<usize>) -> io::Result<Vec<Box<dyn DirEntry + 'a>>> {
        match self {
            MemoryFile::Directory { entries, .. } => {
                let n = limit.unwrap_or(entries.len()).min(entries.len());
                Ok(entries
                    .drain(..n)
                    .map(|entry| Box::new(entry) as Box<dyn DirEntry + 'a>)
                    .collect())
            }
            MemoryFile::File { info, .. } => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {}", info.name()),
            )),
        }
    }
}

impl Filesystem for MemoryFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn File<'_> + '_>> {
        let node = self.node(path)?;
        let info = Self::info(path, node);
        let file = match node {
            Node::File(data) => MemoryFile::File {
                info,
                data: Cursor::new(Arc::clone(data)),
            },
            Node::Directory => MemoryFile::Directory {
                info,
                entries: self.children(path),
            },
        };
        Ok(Box::new(file))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<Box<dyn DirEntry + '_>>> {
        match self.node(path)? {
            Node::Directory => Ok(self
                .children(path)
                .into_iter()
                .map(|entry| Box::new(entry) as Box<dyn DirEntry + '_>)
                .collect()),
            Node::File(_) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {path}"),
            )),
        }
    }

    fn stat(&self, path: &str) -> io::Result<FileInfo> {
        let node = self.node(path)?;
        Ok(Self::info(path, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(entries: &'a [Box<dyn DirEntry + '_>]) -> Vec<&'a str> {
        entries.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_read_file() {
        let fs = MemoryFs::new().with_file("readme.txt", "hello");
        assert_eq!(fs.read_file("readme.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_implicit_parents() {
        let fs = MemoryFs::new().with_file("a/b/c.txt", "deep");

        assert!(fs.stat("a").unwrap().is_dir());
        assert!(fs.stat("a/b").unwrap().is_dir());
        assert_eq!(names(&fs.read_dir(".").unwrap()), vec!["a"]);
        assert_eq!(names(&fs.read_dir("a/b").unwrap()), vec!["c.txt"]);
    }

    #[test]
    fn test_paths_normalized_on_insert() {
        let fs = MemoryFs::new().with_file("/docs//./guide.md", "# guide");
        assert_eq!(fs.read_file("docs/guide.md").unwrap(), b"# guide");
    }

    #[test]
    fn test_list_sorted_and_typed() {
        let fs = MemoryFs::new()
            .with_file("zeta.txt", "z")
            .with_dir("beta")
            .with_file("alpha.txt", "a");

        let entries = fs.read_dir(".").unwrap();
        assert_eq!(names(&entries), vec!["alpha.txt", "beta", "zeta.txt"]);
        assert!(!entries[0].is_dir());
        assert!(entries[1].is_dir());
        assert_eq!(entries[2].info().unwrap().size(), 1);
    }

    #[test]
    fn test_root_stat() {
        let fs = MemoryFs::new();
        let info = fs.stat(".").unwrap();
        assert!(info.is_dir());
        assert_eq!(info.name(), ".");
    }

    #[test]
    fn test_errors() {
        let fs = MemoryFs::new().with_file("a.txt", "a");

        assert_eq!(fs.open("nope").err().unwrap().kind(), io::ErrorKind::NotFound);
        assert_eq!(fs.open("../a.txt").err().unwrap().kind(), io::ErrorKind::InvalidInput);
        assert_eq!(fs.read_dir("a.txt").err().unwrap().kind(), io::ErrorKind::NotADirectory);

        let mut dir = fs.open(".").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(dir.read(&mut buf).unwrap_err().kind(), io::ErrorKind::IsADirectory);

        let mut file = fs.open("a.txt").unwrap();
        assert_eq!(file.read_dir(None).err().unwrap().kind(), io::ErrorKind::NotADirectory);
    }

    #[test]
    fn test_directory_handle_pages() {
        let fs = MemoryFs::new()
            .with_file("1", "")
            .with_file("2", "")
            .with_file("3", "");

        let mut dir = fs.open(".").unwrap();
        assert_eq!(names(&dir.read_dir(Some(2)).unwrap()), vec!["1", "2"]);
        assert_eq!(names(&dir.read_dir(Some(2)).unwrap()), vec!["3"]);
        assert!(dir.read_dir(Some(2)).unwrap().is_empty());
    }

    #[test]
    fn test_mod_times_are_fixed() {
        let build = || MemoryFs::new().with_file("docs/a.txt", "a");
        let (first, second) = (build(), build());

        for path in [".", "docs", "docs/a.txt"] {
            let info = first.stat(path).unwrap();
            assert_eq!(info.mod_time(), std::time::SystemTime::UNIX_EPOCH, "{path}");
            assert_eq!(info, second.stat(path).unwrap());
        }
    }

    #[test]
    fn test_file_becomes_directory_when_nested_under() {
        let fs = MemoryFs::new().with_file("a", "x").with_file("a/b", "y");
        assert!(fs.stat("a").unwrap().is_dir());
        assert_eq!(fs.read_file("a/b").unwrap(), b"y");
    }
}
