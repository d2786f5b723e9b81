//! Error types for model parsing

/// Errors raised while interpreting model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Destination string is neither `product` nor `checkout`
    #[error("unknown destination mode: '{0}'")]
    UnknownDestination(String),

    /// Identifier was empty
    #[error("empty qr code identifier")]
    EmptyId,
}
