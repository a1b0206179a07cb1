use thiserror::Error;

/// Failures a send can run into. Everything here is converted to a
/// user-visible message at the send boundary; nothing propagates past it.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The surface did not expose a conversation id at startup.
    #[error("chat surface did not provide a conversation id")]
    MissingConversationId,

    #[error("network failure reaching chat endpoint: {0}")]
    Network(#[from] reqwest::Error),

    #[error("chat endpoint returned status {status}: {detail}")]
    Endpoint { status: u16, detail: String },

    #[error("malformed reply from chat endpoint: {0}")]
    MalformedReply(String),
}
