//! Errors raised by the composite itself.
//!
//! Everything crosses the API as `std::io::Error`. Errors the composite
//! originates carry a [`MountError`] payload so callers can tell them apart
//! from errors a mounted provider returned; provider errors pass through
//! untouched.

use std::io;
use thiserror::Error;

/// Composite-originated error identities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    /// Empty path to `open`, or a malformed path to `read_dir`.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// `open` on a path whose leading segment names no mount.
    #[error("could not find {0} in mount table")]
    MountNotFound(String),
    /// `read_dir` on a path whose leading segment names no mount.
    #[error("file does not exist: {0}")]
    NotExist(String),
}

impl MountError {
    /// The `io::ErrorKind` this error is reported as.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            MountError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            MountError::MountNotFound(_) | MountError::NotExist(_) => io::ErrorKind::NotFound,
        }
    }

    /// Recover the composite error from an `io::Error`, if it carries one.
    ///
    /// Returns `None` for errors produced by mounted providers.
    pub fn from_io(err: &io::Error) -> Option<&MountError> {
        err.get_ref().and_then(|inner| inner.downcast_ref::<MountError>())
    }
}

impl From<MountError> for io::Error {
    fn from(err: MountError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            MountError::InvalidArgument("x".into()).kind(),
            io::ErrorKind::InvalidInput
        );
        assert_eq!(MountError::MountNotFound("x".into()).kind(), io::ErrorKind::NotFound);
        assert_eq!(MountError::NotExist("x".into()).kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_round_trip_through_io() {
        let err: io::Error = MountError::MountNotFound("assets".into()).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(
            MountError::from_io(&err),
            Some(&MountError::MountNotFound("assets".into()))
        );
        assert!(err.to_string().contains("assets"));
    }

    #[test]
    fn test_foreign_error_has_no_identity() {
        let err = io::Error::new(io::ErrorKind::NotFound, "provider said no");
        assert!(MountError::from_io(&err).is_none());
        assert!(MountError::from_io(&io::Error::from(io::ErrorKind::Other)).is_none());
    }
}
