#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Shopify GraphQL error: {0}")]
    GraphQl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SalesError {
    /// Machine-readable code carried in the `{ success: false, code }` envelope.
    pub fn code(&self) -> &'static str {
        match self {
            SalesError::Http(_) | SalesError::GraphQl(_) => "UPSTREAM_ERROR",
            SalesError::Config(_) => "CONFIG_ERROR",
            SalesError::InvalidArgument(_) => "INVALID_ARGUMENT",
            SalesError::Io(_) | SalesError::Json(_) | SalesError::Csv(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure originated in the remote order source.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SalesError::Http(_) | SalesError::GraphQl(_))
    }
}

pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_are_upstream() {
        let err = SalesError::GraphQl("Throttled".into());
        assert!(err.is_upstream());
        assert_eq!(err.code(), "UPSTREAM_ERROR");
        assert_eq!(err.to_string(), "Shopify GraphQL error: Throttled");
    }

    #[test]
    fn unclassified_errors_map_to_internal() {
        let err = SalesError::from(std::io::Error::other("disk gone"));
        assert!(!err.is_upstream());
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
