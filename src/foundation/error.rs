pub type AvatrResult<T> = Result<T, AvatrError>;

#[derive(thiserror::Error, Debug)]
pub enum AvatrError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("key mint error: {0}")]
    KeyMint(String),

    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("fragment error: {0}")]
    Fragment(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatrError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn key_mint(msg: impl Into<String>) -> Self {
        Self::KeyMint(msg.into())
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }

    pub fn fragment(msg: impl Into<String>) -> Self {
        Self::Fragment(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
