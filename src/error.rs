use std::collections::TryReserveError;
use std::fmt;

/// Failure to grow a dynamic sampler's backing storage.
///
/// This is the one fallible entry point in the public API; every other
/// precondition violation is a programmer error and panics instead (see the
/// crate's top-level docs).
#[derive(Debug)]
pub struct AllocError {
    source: TryReserveError,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to allocate reservoir storage: {}", self.source)
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<TryReserveError> for AllocError {
    fn from(source: TryReserveError) -> Self {
        AllocError { source }
    }
}
