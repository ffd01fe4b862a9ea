//! Error type shared by every storage operation.

use std::fmt;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias defaulting to the storage [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Storage failure: a labelled message and the underlying cause.
pub struct Error {
    message: String,
    source: Option<BoxedError>,
}

impl Error {
    /// Failure while talking to the backend, shown as `[{label}] {msg}`.
    pub fn runtime(msg: impl fmt::Display, label: &str) -> Self {
        Self {
            message: format!("[{label}] {msg}"),
            source: None,
        }
    }

    /// Failure while building a backend client, shown as `[{label}] {msg}`.
    pub fn connection(msg: impl fmt::Display, label: &str) -> Self {
        Self {
            message: format!("[{label}] {msg}"),
            source: None,
        }
    }

    /// Create an error for a local file that could not be read.
    pub fn local_file(path: &std::path::Path, source: std::io::Error) -> Self {
        Self {
            message: format!("[local-file] {}: {source}", path.display()),
            source: Some(Box::new(source)),
        }
    }

    /// Records the underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The formatted message, without the source chain.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Convert an [`object_store::Error`] into a crate [`Error`].
pub(crate) fn from_object_store(err: object_store::Error) -> Error {
    Error::runtime(err.to_string(), "object-store").with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_message_is_labelled() {
        let err = Error::runtime("boom", "object-store");
        assert_eq!(err.to_string(), "[object-store] boom");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn local_file_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::local_file(std::path::Path::new("temp/x.archive"), io);

        assert!(err.message().contains("temp/x.archive"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn object_store_errors_keep_their_cause() {
        let err = from_object_store(object_store::Error::NotFound {
            path: "missing".to_string(),
            source: "no such key".into(),
        });

        assert!(err.message().starts_with("[object-store] "));
        assert!(err.message().contains("missing"));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<object_store::Error>().is_some());
    }
}
