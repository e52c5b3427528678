/// Errors returned by the remote service clients.
///
/// `Service`/`Transport`/`Protocol` carry the name of the service that
/// produced them (`row-store` or `auth`) so a surfaced message says which
/// side failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Invalid client configuration (missing URL or key).
    #[error("config error: {0}")]
    Config(String),
    /// Invalid user input, rejected before any remote call is made.
    #[error("validation error: {0}")]
    Validation(String),
    /// The service answered with an application-level failure (HTTP status).
    #[error("service error ({service}): {message}")]
    Service {
        service: &'static str,
        message: String,
        status_code: Option<u16>,
    },
    /// Transport I/O failed before a response arrived.
    #[error("transport error ({service}): {message}")]
    Transport {
        service: &'static str,
        message: String,
    },
    /// The response arrived but its shape was not the expected one.
    #[error("protocol error ({service}): {message}")]
    Protocol {
        service: &'static str,
        message: String,
    },
}

impl RemoteError {
    /// Creates a service-level error.
    pub fn service(
        service: &'static str,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Service {
            service,
            message: message.into(),
            status_code,
        }
    }

    /// Creates a transport-level error.
    pub fn transport(service: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            service,
            message: message.into(),
        }
    }

    /// Creates a protocol-level error.
    pub fn protocol(service: &'static str, message: impl Into<String>) -> Self {
        Self::Protocol {
            service,
            message: message.into(),
        }
    }

    /// HTTP status of a service error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Service { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
