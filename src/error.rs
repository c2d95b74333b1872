#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("WRONGTYPE operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("no such member '{0}'")]
    MemberNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidArgument(msg.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
