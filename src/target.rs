//! Base address of a monitored Logstash node.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Address used when no target is configured.
pub const DEFAULT_TARGET: &str = "http://127.0.0.1:9600";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("malformed address: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("unsupported scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),

    #[error("address has no host")]
    MissingHost,

    #[error("address must not carry a query or fragment")]
    UnexpectedSuffix,
}

/// Parsed base address (scheme, host, port) of one monitored node.
///
/// Trailing slashes are stripped on parse, so endpoint paths can be appended
/// verbatim. Credentials embedded in the address are only used for requests;
/// [`Target::as_str`], `Display` and `Debug` show the address without them.
#[derive(Clone, PartialEq, Eq)]
pub struct Target {
    /// Full base address, userinfo included
    base: String,

    /// Base address with userinfo removed
    redacted: String,
}

impl Target {
    pub fn parse(address: &str) -> Result<Self, TargetError> {
        let url = Url::parse(address.trim())?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(TargetError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(TargetError::MissingHost);
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(TargetError::UnexpectedSuffix);
        }

        let mut public = url.clone();
        // cannot fail for http(s) urls with a host
        let _ = public.set_username("");
        let _ = public.set_password(None);

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            redacted: public.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of `path` (which must start with `/`) on this node.
    ///
    /// Keeps any credentials of the configured address, so the result must
    /// not end up in logs or events.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Base address without credentials.
    pub fn as_str(&self) -> &str {
        &self.redacted
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Target").field(&self.redacted).finish()
    }
}
