use super::Error;

/// Sentinel error for a write that affected zero rows.
///
/// Distinguishable so callers can treat "nothing changed" differently from
/// a real fault.
#[derive(Debug)]
pub(super) struct NoResultError {
    operation: Box<str>,
}

impl std::error::Error for NoResultError {}

impl core::fmt::Display for NoResultError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} affected no rows", self.operation)
    }
}

impl Error {
    /// Creates a no-result error for the named operation.
    pub fn no_result(operation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoResult(NoResultError {
            operation: operation.into().into(),
        }))
    }

    /// Returns `true` if the root cause is a zero-rows-affected write.
    pub fn is_no_result(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::NoResult(_))
    }
}
