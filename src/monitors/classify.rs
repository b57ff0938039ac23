//! Failure classification
//!
//! Maps transport errors to a small set of operator-facing messages. The
//! mapping is best effort: anything not recognized, TLS failures included,
//! becomes [`UNKNOWN_ERROR`].

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

pub const TIMEOUT: &str = "timeout";
pub const NO_SUCH_HOST: &str = "no such host";
pub const CONNECTION_REFUSED: &str = "connection refused";
pub const OP_ERROR: &str = "OpError";
pub const ADDR_ERROR: &str = "AddrError";
pub const DNS_ERROR: &str = "DNSError";
pub const UNKNOWN_ERROR: &str = "unknown error";
pub const NOT_IMPLEMENTED: &str = "not implemented";

const TLS_HINTS: [&str; 3] = ["tls", "certificate", "handshake"];
const RESOLVE_HINTS: [&str; 4] = [
    "failed to lookup address",
    "no such host",
    "name or service not known",
    "nodename nor servname",
];

/// Errors produced while executing a monitor
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0} monitors are not implemented")]
    NotImplemented(&'static str),
}

/// Transport independent kind of a probe failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Deadline exceeded
    Timeout,
    /// Host name did not resolve
    Resolve,
    /// Resolver failed for another reason
    Dns,
    /// Connection refused or torn down by the peer
    Refused,
    /// Any other failure while dialing
    Dial,
    /// Failure after the connection was established
    Request,
    /// The target is not a usable address
    Address,
    Tls,
    Other,
}

impl FailureKind {
    /// Kind of a failed `reqwest` request
    pub fn of(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        if error.is_builder() {
            return Self::Address;
        }

        // the outermost message embeds the url, only the causes are inspected
        let kind = error.source().map_or(Self::Other, Self::from_chain);

        match kind {
            Self::Other if error.is_connect() => Self::Dial,
            Self::Other if error.is_request() || error.is_body() => Self::Request,
            kind => kind,
        }
    }

    /// Kind derived from an error chain alone
    pub fn from_chain(error: &(dyn StdError + 'static)) -> Self {
        let layers: Vec<Self> = sources(error).filter_map(Self::from_layer).collect();

        [Self::Timeout, Self::Tls, Self::Refused, Self::Resolve, Self::Dns]
            .into_iter()
            .find(|kind| layers.contains(kind))
            .unwrap_or(Self::Other)
    }

    fn from_layer(error: &(dyn StdError + 'static)) -> Option<Self> {
        if let Some(io) = error.downcast_ref::<io::Error>() {
            match io.kind() {
                io::ErrorKind::TimedOut => return Some(Self::Timeout),
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof => return Some(Self::Refused),
                _ => {}
            }
        }

        let message = error.to_string().to_lowercase();
        let mentions = |hints: &[&str]| hints.iter().any(|hint| message.contains(hint));

        if mentions(&TLS_HINTS) {
            Some(Self::Tls)
        } else if mentions(&RESOLVE_HINTS) {
            Some(Self::Resolve)
        } else if message.contains("dns error") {
            Some(Self::Dns)
        } else {
            None
        }
    }

    /// Message stored in the monitor state
    pub fn message(self) -> &'static str {
        match self {
            Self::Timeout => TIMEOUT,
            Self::Resolve | Self::Dial => NO_SUCH_HOST,
            Self::Dns => DNS_ERROR,
            Self::Refused => CONNECTION_REFUSED,
            Self::Request => OP_ERROR,
            Self::Address => ADDR_ERROR,
            Self::Tls | Self::Other => UNKNOWN_ERROR,
        }
    }
}

/// Classify a probe failure into its state message
pub fn classify(error: &ProbeError) -> &'static str {
    match error {
        ProbeError::Http(e) => FailureKind::of(e).message(),
        ProbeError::NotImplemented(_) => NOT_IMPLEMENTED,
    }
}

fn sources<'a>(error: &'a (dyn StdError + 'static)) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(error), |&e| e.source())
}
