use super::Error;

/// Error when a driver-reported database type name matches none of the
/// dialect's classification categories.
///
/// Fatal to the current row or operation; there is no silent default type.
/// Recovering requires a dialect fix, not a retry.
#[derive(Debug)]
pub(super) struct UnknownTypeError {
    db_type: Box<str>,
}

impl std::error::Error for UnknownTypeError {}

impl core::fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unrecognized database type `{}`", self.db_type)
    }
}

impl Error {
    /// Creates an unrecognized-type error for the given type name.
    pub fn unknown_type(db_type: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownType(UnknownTypeError {
            db_type: db_type.into().into(),
        }))
    }

    /// Returns `true` if the root cause is an unrecognized database type.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownType(_))
    }
}
