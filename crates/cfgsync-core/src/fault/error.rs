//! Fault returned by the RPC transport.

use std::fmt;

/// A fault surfaced by the remote service or by the transport underneath it.
///
/// `message` is kept verbatim; classification and page-size estimation both
/// read it. `code` is whatever the transport could attach (a SOAP-style fault
/// code, an HTTP status, a curl error number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFault {
    pub message: String,
    pub code: Option<String>,
}

impl RemoteFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RemoteFault {}
