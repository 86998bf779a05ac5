//! Errors raised while talking to the documentation assistant.

/// Errors that can occur while asking the upstream assistant.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// The assistant answered with a non-success status.
    #[error("Assistant API error: {status} {status_text}")]
    Upstream {
        /// Numeric HTTP status.
        status: u16,
        /// Canonical reason phrase, or `Unknown Status` when the status has none.
        status_text: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot carry the assistant path.
    #[error("Invalid assistant base URL: {0}")]
    InvalidBaseUrl(String),
}

impl AssistantError {
    /// Build an [`AssistantError::Upstream`] from a response status.
    #[must_use]
    pub fn upstream(status: reqwest::StatusCode) -> Self {
        Self::Upstream {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_carries_status() {
        let err = AssistantError::upstream(reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_string(), "Assistant API error: 429 Too Many Requests");
        assert!(matches!(err, AssistantError::Upstream { status: 429, .. }));
    }

    #[test]
    fn test_nonstandard_status_has_reason_text() {
        let status = reqwest::StatusCode::from_u16(520).unwrap();
        let err = AssistantError::upstream(status);
        assert_eq!(err.to_string(), "Assistant API error: 520 Unknown Status");
    }
}
