use wordbook_gateway::GatewayError;

/// Everything a translate action can end in. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("Select some text first.")]
    EmptySelection,

    #[error("Selection too long ({length}). Limit {limit}.")]
    SelectionTooLong { length: usize, limit: usize },

    #[error("Please set your API key first (wordbook --set-key <KEY>).")]
    MissingCredential,

    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    /// The endpoint answered but the body was not a completion
    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),

    #[error("Couldn't parse.")]
    UnparsableResponse { raw_snippet: String },
}

impl TranslateError {
    /// Conditions reported as a toast before any popup opens
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            TranslateError::EmptySelection
                | TranslateError::SelectionTooLong { .. }
                | TranslateError::MissingCredential
        )
    }
}

impl From<GatewayError> for TranslateError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::MissingCredential => TranslateError::MissingCredential,
            GatewayError::Http {
                status,
                status_text,
            } => TranslateError::Http {
                status,
                status_text,
            },
            GatewayError::Timeout => TranslateError::Timeout,
            GatewayError::Network(msg) => TranslateError::Network(msg),
            GatewayError::Decode(msg) => TranslateError::InvalidResponse(msg),
            other => TranslateError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_long_message_cites_both_numbers() {
        let err = TranslateError::SelectionTooLong {
            length: 300,
            limit: 280,
        };
        assert_eq!(err.to_string(), "Selection too long (300). Limit 280.");
        assert!(err.is_precondition());
    }

    #[test]
    fn test_gateway_errors_map_into_taxonomy() {
        assert_eq!(
            TranslateError::from(GatewayError::Timeout),
            TranslateError::Timeout
        );
        assert_eq!(
            TranslateError::from(GatewayError::RelayClosed),
            TranslateError::Network("Relay is not running".to_string())
        );
        assert_eq!(
            TranslateError::from(GatewayError::Decode("expected value".to_string())),
            TranslateError::InvalidResponse("expected value".to_string())
        );
        assert!(!TranslateError::from(GatewayError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string()
        })
        .is_precondition());
    }
}
