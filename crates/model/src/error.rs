/// Error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Empty address.
    #[error("empty address")]
    EmptyAddress,
    /// Invalid address.
    #[error("invalid address `{0}`: {1}")]
    InvalidAddress(String, &'static str),
}
