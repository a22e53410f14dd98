//! mountfs: a composite read-only filesystem.
//!
//! Several independently implemented providers are mounted by name under one
//! synthetic root. Paths into the union are the mount name followed by the
//! provider-relative path:
//!
//! ```text
//! .                      # synthetic root, lists the mount names
//! ├── assets/            # MemoryFs
//! │   └── readme.txt     # assets provider's "readme.txt"
//! └── site/              # LocalFs rooted at /srv/site
//! ```
//!
//! - **Filesystem**: the provider trait; anything implementing it can be mounted
//! - **MountFs**: the composite, itself a `Filesystem`, so composites nest
//! - **MemoryFs** / **LocalFs**: bundled providers
//! - **walk**: recursive listing over any `Filesystem`
//!
//! ```
//! use mountfs::{DirEntry, Filesystem, MemoryFs, MountFs};
//!
//! let fs = MountFs::new()
//!     .with_mount("assets", MemoryFs::new().with_file("readme.txt", "hi"))
//!     .with_mount("config", MemoryFs::new());
//!
//! let names: Vec<String> = fs
//!     .read_dir(".")?
//!     .iter()
//!     .map(|e| e.name().to_string())
//!     .collect();
//! assert_eq!(names, ["assets", "config"]);
//! assert_eq!(fs.read_file("assets/readme.txt")?, b"hi");
//! # Ok::<(), std::io::Error>(())
//! ```

mod error;
mod local;
mod memory;
mod options;
pub mod path;
mod registry;
mod root;
mod router;
mod traits;
mod walk;

pub use error::MountError;
pub use local::LocalFs;
pub use memory::MemoryFs;
pub use options::{MountFsOptions, RootTime, DEFAULT_ROOT_NAME};
pub use registry::MountRegistry;
pub use root::MountEntry;
pub use router::MountFs;
pub use traits::{DirEntry, EntryType, File, FileInfo, FileMode, Filesystem, InfoEntry};
pub use walk::{walk, EntryTypes, WalkEntry, WalkOptions};
