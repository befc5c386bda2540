/// Result alias that carries the custom [`AlgoVizError`] type.
pub type Result<T> = std::result::Result<T, AlgoVizError>;

/// Common error type for the core crate.
///
/// The engines themselves never fail on well-typed integers: a search miss or
/// an extract from an empty heap is an ordinary result. Errors only surface
/// from configuration loading and from requests that cannot be satisfied at
/// all, such as asking for more distinct random values than a range holds.
#[derive(Debug, thiserror::Error)]
pub enum AlgoVizError {
    /// Free-form message for failures that do not warrant their own variant.
    #[error("{0}")]
    Message(String),
    /// A request whose arguments can never produce a result.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed configuration or trace JSON.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl AlgoVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<&str> for AlgoVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for AlgoVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
