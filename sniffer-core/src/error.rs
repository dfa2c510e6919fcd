//! Error types for the sniffer workspace

use thiserror::Error;

/// Result type alias for sniffer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the sniffer workspace
///
/// Decode failures are not represented here: parsers report them as `None`
/// and the frame generator skips the offending buffer.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error on the capture destination
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Insufficient privileges to open the capture socket
    #[error("Insufficient privileges: {0}")]
    InsufficientPrivileges(String),

    /// Packet capture backend error
    #[error("Packet capture error: {0}")]
    Capture(String),

    /// The capture device does not deliver Ethernet frames
    #[error("Unsupported link type: {0}")]
    LinkType(String),

    /// A frame source has no more buffers to hand out
    #[error("Frame source exhausted")]
    SourceExhausted,

    /// Write attempted on a closed capture writer
    #[error("Capture writer is closed")]
    WriterClosed,

    /// Header table lookup failed
    #[error("No header with name {0}")]
    NoSuchHeader(String),

    /// Unknown protocol name
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    /// Operation interrupted
    #[error("Operation interrupted: {0}")]
    Interrupted(String),
}

impl Error {
    /// Create a capture error with a custom message
    pub fn capture<S: Into<String>>(msg: S) -> Self {
        Error::Capture(msg.into())
    }

    /// Create an interruption error with a custom message
    pub fn interrupted<S: Into<String>>(msg: S) -> Self {
        Error::Interrupted(msg.into())
    }

    /// Whether this error is a cooperative cancellation rather than a failure
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Interrupted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InterfaceNotFound("eth9".to_string()).to_string(),
            "Interface 'eth9' not found"
        );
        assert_eq!(
            Error::NoSuchHeader("ttl".to_string()).to_string(),
            "No header with name ttl"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_interrupted());
    }

    #[test]
    fn test_interrupted() {
        assert!(Error::interrupted("ctrl-c").is_interrupted());
        assert!(!Error::capture("boom").is_interrupted());
    }
}
