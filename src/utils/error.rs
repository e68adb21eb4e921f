use crate::core::xml_tree::XmlNode;
use std::fmt;
use thiserror::Error;

/// 錯誤發生的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Request,
    XmlParse,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Request => f.write_str("request"),
            Phase::XmlParse => f.write_str("xml parse"),
        }
    }
}

/// Which call failed and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub operation: &'static str,
    pub phase: Phase,
}

impl ErrorContext {
    pub fn new(operation: &'static str, phase: Phase) -> Self {
        Self { operation, phase }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.operation, self.phase)
    }
}

/// Failure reported by a [`Transport`](crate::domain::ports::Transport).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
            source: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let timed_out = err.is_timeout();
        let message = if timed_out {
            format!("request timed out: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        Self {
            message,
            timed_out,
            source: Some(Box::new(err)),
        }
    }
}

/// XML 解析錯誤
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid text encoding: {0}")]
    Encoding(String),

    #[error("unknown entity reference: &{0};")]
    UnknownEntity(String),

    #[error("unexpected end of document inside <{0}>")]
    UnclosedElement(String),

    #[error("document has no root element")]
    MissingRoot,

    #[error("second root element <{0}> after the document root")]
    MultipleRoots(String),

    #[error("content outside the root element: {0:?}")]
    ContentOutsideRoot(String),
}

/// Whether the service rejected the whole call or only the requested node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Root,
    Node,
}

/// An `<Error>` payload returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainError {
    pub message: String,
    pub raw: XmlNode,
    pub scope: ErrorScope,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DomainError {}

#[derive(Error, Debug)]
pub enum UspsError {
    #[error("Configuration error: {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("{context} failed: {source}")]
    Transport {
        context: ErrorContext,
        #[source]
        source: TransportError,
    },

    #[error("{operation} failed to build request envelope: {source}")]
    Envelope {
        operation: &'static str,
        #[source]
        source: XmlError,
    },

    #[error("{context} failed: {source}")]
    Parse {
        context: ErrorContext,
        #[source]
        source: XmlError,
    },

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Unexpected response shape for {operation}: missing '{missing}' in path '{path}'")]
    UnexpectedShape {
        operation: &'static str,
        path: String,
        missing: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Protocol,
    Service,
}

impl UspsError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        UspsError::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            UspsError::Config { .. } => ErrorCategory::Configuration,
            UspsError::Transport { .. } => ErrorCategory::Network,
            UspsError::Envelope { .. }
            | UspsError::Parse { .. }
            | UspsError::UnexpectedShape { .. } => ErrorCategory::Protocol,
            UspsError::Domain(_) => ErrorCategory::Service,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UspsError::Transport { source, .. } if source.timed_out)
    }

    /// 服務端回傳的錯誤（若有）
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            UspsError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, UspsError>;
