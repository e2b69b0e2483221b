//! Errors from the `config.ron` round trip.

/// Why the viewer settings could not be loaded or stored. Callers fall back
/// to [`Config::default`](crate::Config::default) on any of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `config.ron` exists but could not be read.
    #[error("could not read orrery settings: {0}")]
    ReadError(#[source] std::io::Error),

    /// The settings directory or file could not be written.
    #[error("could not write orrery settings: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file is not valid RON for [`Config`](crate::Config). Carries the
    /// line and column of the first bad token.
    #[error("orrery settings are malformed: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("could not encode orrery settings: {0}")]
    SerializeError(#[source] ron::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_position() {
        let spanned = ron::from_str::<crate::Config>("(window: (width: \"wide\"))").unwrap_err();
        let message = ConfigError::ParseError(spanned).to_string();
        assert!(message.starts_with("orrery settings are malformed: 1:"));
    }

    #[test]
    fn test_io_error_is_source() {
        let err = ConfigError::ReadError(std::io::Error::other("denied"));
        assert_eq!(err.to_string(), "could not read orrery settings: denied");
        assert!(std::error::Error::source(&err).is_some());
    }
}
