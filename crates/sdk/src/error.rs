use ubet_model::Address;

/// SDK Error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from [`ubet_model`].
    #[error("model: {0}")]
    Model(#[from] ubet_model::Error),
    /// The user population cannot be enumerated.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    /// The referrer of a single user cannot be resolved.
    #[error("lookup failed for `{address}`: {message}")]
    LookupFailed {
        /// The user.
        address: Address,
        /// Reason.
        message: String,
    },
    /// The operation was cancelled or timed out.
    #[error("cancelled")]
    Cancelled,
    /// Transport error.
    #[error("transport: {0}")]
    Transport(String),
    /// JSON-RPC error object.
    #[error("rpc: {message} (code {code})")]
    Rpc {
        /// Error code.
        code: i64,
        /// Error message.
        message: String,
    },
    /// Malformed ABI data.
    #[error("abi: {0}")]
    Abi(&'static str),
    /// Hex decode error.
    #[error("hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// Reqwest error.
    #[cfg(client)]
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// JSON error.
    #[cfg(client)]
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// Unknown error.
    #[error("unknown: {0}")]
    Unknown(String),
}

impl Error {
    /// Create an unknown error.
    pub fn unknown(msg: impl ToString) -> Self {
        Self::Unknown(msg.to_string())
    }

    /// Create a transport error.
    pub fn transport(msg: impl ToString) -> Self {
        Self::Transport(msg.to_string())
    }

    /// Create a lookup failure for the given user.
    pub fn lookup_failed(address: &Address, msg: impl ToString) -> Self {
        Self::LookupFailed {
            address: address.clone(),
            message: msg.to_string(),
        }
    }

    /// Wrap as [`Error::SourceUnavailable`], unless it already is one or
    /// the operation was cancelled.
    pub fn into_source_unavailable(self) -> Self {
        match self {
            Self::SourceUnavailable(_) | Self::Cancelled => self,
            other => Self::SourceUnavailable(other.to_string()),
        }
    }

    /// Message to record for a failed lookup.
    pub(crate) fn lookup_message(&self) -> String {
        match self {
            Self::LookupFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
