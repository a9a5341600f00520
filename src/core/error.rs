//! Error types for the logger system

use super::severity::Severity;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Enqueue attempted on a closed severity channel
    #[error("the {severity} channel was closed for recording")]
    ChannelClosed { severity: Severity },

    /// No channel is attached to the severity
    #[error("Logger {severity} not configured")]
    NotConfigured { severity: Severity },

    /// One strategy failed to write a message
    #[error("strategy '{strategy}' failed after {written} bytes: {message}")]
    StrategyWriteFailed {
        strategy: String,
        written: usize,
        message: String,
    },

    /// Backing file cannot be opened or was never opened
    #[error("file '{path}' is unavailable")]
    FileUnavailable {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Parent directory of a log file cannot be created
    #[error("can't create directory for '{path}'")]
    DirectoryUnavailable {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Mail could not be handed to the outbound sender
    #[error("mail delivery failed: {0}")]
    MailDelivery(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Delivery loop thread could not be started
    #[error("failed to spawn delivery thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn channel_closed(severity: Severity) -> Self {
        LoggerError::ChannelClosed { severity }
    }

    pub fn not_configured(severity: Severity) -> Self {
        LoggerError::NotConfigured { severity }
    }

    pub fn strategy_write(
        strategy: impl Into<String>,
        written: usize,
        message: impl Into<String>,
    ) -> Self {
        LoggerError::StrategyWriteFailed {
            strategy: strategy.into(),
            written,
            message: message.into(),
        }
    }

    /// Create a file error, optionally keeping the IO cause
    pub fn file_unavailable(path: impl Into<String>, source: Option<std::io::Error>) -> Self {
        LoggerError::FileUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn directory_unavailable(path: impl Into<String>, source: Option<std::io::Error>) -> Self {
        LoggerError::DirectoryUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn mail<S: Into<String>>(msg: S) -> Self {
        LoggerError::MailDelivery(msg.into())
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for the closed-channel codepath
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, LoggerError::ChannelClosed { .. })
    }
}

impl From<LoggerError> for std::io::Error {
    fn from(err: LoggerError) -> Self {
        match err {
            LoggerError::IoError(io) => io,
            LoggerError::ChannelClosed { .. } => {
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, err)
            }
            other => std::io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::channel_closed(Severity::Info);
        assert!(err.is_channel_closed());

        let err = LoggerError::config("channel", "capacity too large");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_unavailable("/var/log/app.log", None);
        assert!(matches!(err, LoggerError::FileUnavailable { .. }));
        assert!(!err.is_channel_closed());
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::channel_closed(Severity::Warning);
        assert_eq!(
            err.to_string(),
            "the Warning channel was closed for recording"
        );

        let err = LoggerError::not_configured(Severity::Error);
        assert_eq!(err.to_string(), "Logger Error not configured");

        let err = LoggerError::strategy_write("file", 0, "file is not defined");
        assert_eq!(
            err.to_string(),
            "strategy 'file' failed after 0 bytes: file is not defined"
        );
    }

    #[test]
    fn test_into_io_error() {
        let io: std::io::Error = LoggerError::channel_closed(Severity::Info).into();
        assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);

        let io: std::io::Error = LoggerError::mail("smtp down").into();
        assert_eq!(io.kind(), std::io::ErrorKind::Other);
        assert!(io.to_string().contains("smtp down"));
    }
}
