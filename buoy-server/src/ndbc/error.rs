//! NDBC fetch error types.

/// Errors from fetching an NDBC text resource.
///
/// Every variant carries the URL (or resource name, for the mock source)
/// that failed, so the rendered message is useful on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection, DNS or protocol failure
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read as text
    #[error("failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Classify a reqwest error raised while sending a request.
    pub fn from_send(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Classify a reqwest error raised while reading a response body.
    pub fn from_body(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// The URL or resource name the failure relates to.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url }
            | FetchError::Network { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }

    /// Short machine-friendly label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => "timeout",
            FetchError::Network { .. } => "network",
            FetchError::Status { .. } => "status",
            FetchError::Body { .. } => "body",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError::Timeout {
            url: "https://example.test/a.txt".into(),
        };
        assert_eq!(err.to_string(), "request to https://example.test/a.txt timed out");

        let err = FetchError::Status {
            url: "https://example.test/99999.txt".into(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "https://example.test/99999.txt returned HTTP 404"
        );

        let err = FetchError::Network {
            url: "https://example.test".into(),
            message: "connection refused".into(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn kind_and_url() {
        let err = FetchError::Body {
            url: "x".into(),
            message: "invalid utf-8".into(),
        };
        assert_eq!(err.kind(), "body");
        assert_eq!(err.url(), "x");
    }
}
