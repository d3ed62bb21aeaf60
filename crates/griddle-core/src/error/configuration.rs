use super::Error;

/// Error from a schema or caller misconfiguration: an unknown table, a
/// missing column definition, an empty essential-column list, a missing
/// key value in a query-by-example. Never retried; indicates a bug in the
/// schema or the calling code, not a runtime condition.
#[derive(Debug)]
pub(super) struct ConfigurationError {
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if the root cause is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::Configuration(_))
    }
}
