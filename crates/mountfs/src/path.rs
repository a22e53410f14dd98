//! Virtual path rules.
//!
//! Paths are relative and `/`-separated on every platform. `"."` is the root
//! of whatever filesystem is being addressed; in a [`crate::MountFs`] the
//! first segment of any other path names a mount.

/// The root path.
pub const ROOT: &str = ".";

/// Path separator.
pub const SEPARATOR: char = '/';

/// Check that `path` is clean, relative, and free of traversal segments.
///
/// `"."` is valid. Otherwise every `/`-separated segment must be non-empty
/// and neither `.` nor `..`, which also rules out leading and trailing
/// slashes.
pub fn is_valid_path(path: &str) -> bool {
    if path == ROOT {
        return true;
    }
    !path.is_empty()
        && path
            .split(SEPARATOR)
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Split a path into its mount name and the remainder.
///
/// A path without a separator addresses the mount's root, so the remainder
/// defaults to `"."`. The remainder is otherwise returned untouched.
pub fn split_mount(path: &str) -> (&str, &str) {
    match path.split_once(SEPARATOR) {
        Some((mount, rest)) => (mount, rest),
        None => (path, ROOT),
    }
}

/// Join a directory path and an entry name.
pub fn join(dir: &str, name: &str) -> String {
    if dir == ROOT {
        name.to_string()
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}

/// Parent directory of a valid path; the root is its own parent.
pub fn parent(path: &str) -> &str {
    path.rsplit_once(SEPARATOR)
        .map(|(parent, _)| parent)
        .unwrap_or(ROOT)
}

/// Last segment of a valid path.
pub fn base_name(path: &str) -> &str {
    path.rsplit_once(SEPARATOR)
        .map(|(_, name)| name)
        .unwrap_or(path)
}
