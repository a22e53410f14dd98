//! Composite filesystem: routes paths to mounted providers.
//!
//! The first segment of a path names a mount and the remainder is handed to
//! that mount's provider untouched. `"."` is answered by the composite
//! itself, as a directory containing exactly the mount names.

use crate::error::MountError;
use crate::options::MountFsOptions;
use crate::path::{is_valid_path, split_mount, ROOT};
use crate::registry::MountRegistry;
use crate::root::{list_root, RootFile};
use crate::traits::{DirEntry, File, Filesystem};
use std::fmt;
use std::io;

/// A read-only union of named providers under one synthetic root.
///
/// Registration takes `&mut self` and every read takes `&self`; wrap the
/// composite in a `RwLock` to mount while other threads are reading.
///
/// Root handles and root entries borrow the composite, so a listing can
/// never outlive the mount table it was taken from:
///
/// ```compile_fail
/// use mountfs::{Filesystem, MemoryFs, MountFs};
///
/// let mut fs = MountFs::new().with_mount("data", MemoryFs::new());
/// let entries = fs.read_dir(".")?;
/// fs.mount("data", MemoryFs::new().with_file("new.txt", "new"));
/// entries[0].info()?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Default)]
pub struct MountFs {
    registry: MountRegistry,
    options: MountFsOptions,
}

impl fmt::Debug for MountFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountFs")
            .field("mounts", &self.mounts())
            .field("options", &self.options)
            .finish()
    }
}

impl MountFs {
    /// Create an empty composite with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MountFsOptions) -> Self {
        Self {
            registry: MountRegistry::new(),
            options,
        }
    }

    /// Mount a provider under `name`, replacing any provider already there.
    ///
    /// Returns `true` if a provider was replaced.
    pub fn mount(&mut self, name: impl Into<String>, fs: impl Filesystem + 'static) -> bool {
        self.registry.register(name, fs)
    }

    /// Builder form of [`MountFs::mount`].
    pub fn with_mount(mut self, name: impl Into<String>, fs: impl Filesystem + 'static) -> Self {
        self.mount(name, fs);
        self
    }

    /// Mount names, sorted.
    pub fn mounts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.names().into_iter().map(String::from).collect();
        names.sort();
        names
    }
}

impl Filesystem for MountFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn File<'_> + '_>> {
        if path.is_empty() {
            return Err(MountError::InvalidArgument("could not find path".to_string()).into());
        }

        if path == ROOT {
            return Ok(Box::new(RootFile::new(&self.registry, &self.options)));
        }

        let (mount, rest) = split_mount(path);
        let fs = self
            .registry
            .lookup(mount)
            .ok_or_else(|| MountError::MountNotFound(mount.to_string()))?;

        tracing::trace!(mount, rest, "routing open");
        fs.open(rest)
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<Box<dyn DirEntry + '_>>> {
        if !is_valid_path(path) {
            return Err(MountError::InvalidArgument(format!("invalid path: {path:?}")).into());
        }

        if path == ROOT {
            return Ok(list_root(&self.registry));
        }

        let (mount, rest) = split_mount(path);
        let fs = self
            .registry
            .lookup(mount)
            .ok_or_else(|| MountError::NotExist(mount.to_string()))?;

        tracing::trace!(mount, rest, "routing read_dir");
        fs.read_dir(rest)
    }
}
