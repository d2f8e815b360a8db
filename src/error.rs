use thiserror::Error;

/// Errors raised by the conversion service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The segmentation dictionary failed to load
    #[error("failed to initialize tokenizer: {0}")]
    ServiceInit(String),

    /// Conversion was requested before the tokenizer finished loading
    #[error("tokenizer is not ready")]
    ServiceNotReady,

    /// `initialize` was called on a service that already left `Uninitialized`
    #[error("tokenizer initialization was already attempted")]
    AlreadyInitialized,
}
