//! Error types for marketplace dispatch and polling
//!
//! Distinguishes "network broke" from "we sent garbage" from "the service
//! rejected the request" so callers can attribute failures precisely.

use thiserror::Error;

/// Main error type for marketplace operations
#[derive(Debug, Error)]
pub enum MarketError {
    /// Network, DNS, or TLS failure while talking to the marketplace.
    /// Never retried by the client; retry policy belongs to the caller.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response envelope could not be parsed as XML.
    #[error("failed to decode response envelope: {0}")]
    Decode(#[from] quick_xml::DeError),

    /// The envelope parsed, but the nested answer payload inside it did not.
    /// Kept distinct from [`MarketError::Decode`] so failure attribution
    /// (envelope-invalid vs. inner-payload-invalid) stays precise.
    #[error("failed to decode answer payload: {0}")]
    AnswerDecode(#[source] quick_xml::DeError),

    /// The service marked the response invalid via its validity flag.
    #[error("marketplace rejected the request: {0}")]
    InvalidResponse(String),

    /// Configuration error, only possible at startup.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl MarketError {
    /// Create an invalid-response error
    pub fn invalid_response<S: Into<String>>(reason: S) -> Self {
        Self::InvalidResponse(reason.into())
    }
}

/// Result type for marketplace operations
pub type MarketResult<T> = Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::wire::TaskAnswers;

    #[test]
    fn test_invalid_response_display() {
        let err = MarketError::invalid_response("validity flag was false");
        assert_eq!(
            err.to_string(),
            "marketplace rejected the request: validity flag was false"
        );
    }

    #[test]
    fn test_decode_and_answer_decode_are_distinct() {
        let outer = quick_xml::de::from_str::<TaskAnswers>("<not-xml")
            .expect_err("truncated document must not parse");
        let inner = quick_xml::de::from_str::<TaskAnswers>("<not-xml")
            .expect_err("truncated document must not parse");

        let outer = MarketError::from(outer);
        let inner = MarketError::AnswerDecode(inner);

        assert!(matches!(outer, MarketError::Decode(_)));
        assert!(matches!(inner, MarketError::AnswerDecode(_)));
        assert!(inner
            .to_string()
            .starts_with("failed to decode answer payload"));
    }
}
