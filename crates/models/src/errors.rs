use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("malformed token reply")]
    MalformedTokenReply,
}
