//! Composite configuration.

use std::time::SystemTime;

/// Name reported by `stat(".")` on a composite unless configured otherwise.
pub const DEFAULT_ROOT_NAME: &str = "mountfs";

/// Modification time reported for the synthetic root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootTime {
    /// Always report this instant.
    Fixed(SystemTime),
    /// Report the wall-clock time at each `stat`.
    Now,
}

impl Default for RootTime {
    fn default() -> Self {
        RootTime::Fixed(SystemTime::UNIX_EPOCH)
    }
}

impl RootTime {
    pub fn resolve(&self) -> SystemTime {
        match self {
            RootTime::Fixed(time) => *time,
            RootTime::Now => SystemTime::now(),
        }
    }
}

/// Options for a [`crate::MountFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountFsOptions {
    /// Name of the synthetic root as reported by `stat`.
    pub root_name: String,
    pub root_time: RootTime,
}

impl Default for MountFsOptions {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            root_time: RootTime::default(),
        }
    }
}

impl MountFsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    pub fn with_root_time(mut self, time: RootTime) -> Self {
        self.root_time = time;
        self
    }
}
