//! Mount table: mount name to provider.

use crate::traits::Filesystem;
use std::collections::HashMap;
use std::fmt;

/// Holds the providers mounted into a composite, keyed by name.
///
/// Each provider is owned by its entry. Registering a name that is already
/// present drops the old provider. Names are not validated; callers keep `/`
/// out of them. Iteration order is unspecified.
#[derive(Default)]
pub struct MountRegistry {
    mounts: HashMap<String, Box<dyn Filesystem>>,
}

impl fmt::Debug for MountRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("MountRegistry")
            .field("mounts", &names)
            .finish()
    }
}

impl MountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a provider under `name`.
    ///
    /// Returns `true` if an earlier provider was replaced.
    pub fn register(&mut self, name: impl Into<String>, fs: impl Filesystem + 'static) -> bool {
        let name = name.into();
        let replaced = self.mounts.insert(name.clone(), Box::new(fs)).is_some();
        tracing::debug!(mount = %name, replaced, "registered mount");
        replaced
    }

    /// Find the provider mounted under exactly `name`.
    pub fn lookup(&self, name: &str) -> Option<&dyn Filesystem> {
        self.mounts.get(name).map(|fs| fs.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mounts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Mount names, in no particular order.
    pub fn names(&self) -> Vec<&str> {
        self.mounts.keys().map(String::as_str).collect()
    }

    /// Iterate over `(name, provider)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Filesystem)> {
        self.mounts.iter().map(|(name, fs)| {
            let fs: &dyn Filesystem = fs.as_ref();
            (name.as_str(), fs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFs;
    use crate::traits::File;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = MountRegistry::new();
        assert!(registry.is_empty());

        assert!(!registry.register("assets", MemoryFs::new().with_file("a.txt", "a")));
        assert!(registry.contains("assets"));
        assert_eq!(registry.len(), 1);

        let fs = registry.lookup("assets").expect("mounted");
        assert_eq!(fs.read_file("a.txt").unwrap(), b"a");
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut registry = MountRegistry::new();
        registry.register("assets", MemoryFs::new());

        assert!(registry.lookup("asset").is_none());
        assert!(registry.lookup("Assets").is_none());
        assert!(registry.lookup("assets/").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = MountRegistry::new();
        registry.register("data", MemoryFs::new().with_file("v.txt", "first"));
        assert!(registry.register("data", MemoryFs::new().with_file("v.txt", "second")));

        assert_eq!(registry.len(), 1);
        let fs = registry.lookup("data").expect("mounted");
        assert_eq!(fs.read_file("v.txt").unwrap(), b"second");
    }

    /// Counts how many times it has been dropped.
    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Filesystem for DropCounter {
        fn open(&self, path: &str) -> io::Result<Box<dyn File<'_> + '_>> {
            Err(io::Error::new(io::ErrorKind::NotFound, path.to_string()))
        }
    }

    #[test]
    fn test_replaced_provider_is_dropped() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut registry = MountRegistry::new();
        registry.register("data", DropCounter(Arc::clone(&drops)));
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        registry.register("data", MemoryFs::new());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_debug_lists_sorted_names() {
        let mut registry = MountRegistry::new();
        registry.register("b", MemoryFs::new());
        registry.register("a", MemoryFs::new());
        assert_eq!(format!("{registry:?}"), r#"MountRegistry { mounts: ["a", "b"] }"#);
    }
}
