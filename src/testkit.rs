//! Failure chains for tests.

use std::error::Error;
use std::fmt;

/// An error that wraps another, standing in for the layers an authenticator
/// puts around a provider failure.
#[derive(Debug)]
pub(crate) struct Wrapped {
    layer: usize,
    cause: Option<Box<dyn Error + Send + Sync>>,
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handshake layer {} failed", self.layer)
    }
}

impl Error for Wrapped {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

/// A failure with no underlying cause.
pub(crate) fn bare() -> Wrapped {
    Wrapped {
        layer: 0,
        cause: None,
    }
}

/// Wrap `root` so that it sits `depth` links below the returned failure.
/// A depth of 1 makes `root` the immediate cause.
pub(crate) fn chain<E>(depth: usize, root: E) -> Wrapped
where
    E: Error + Send + Sync + 'static,
{
    assert!(depth >= 1);
    let mut failure = Wrapped {
        layer: depth,
        cause: Some(Box::new(root)),
    };
    for layer in (1..depth).rev() {
        failure = Wrapped {
            layer,
            cause: Some(Box::new(failure)),
        };
    }
    failure
}

/// A chain of `depth` wrappers that never reaches a provider error.
pub(crate) fn opaque_chain(depth: usize) -> Wrapped {
    chain(depth, bare())
}

/// A malformed error whose source is itself.
#[derive(Debug)]
pub(crate) struct Cyclic;

impl fmt::Display for Cyclic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cyclic")
    }
}

impl Error for Cyclic {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}
