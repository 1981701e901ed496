use thiserror::Error;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to upload {file_name}: {reason}")]
    Upload { file_name: String, reason: String },

    #[error("messages can only be edited or deleted within 15 minutes of sending")]
    EditWindowExpired,

    #[error("missing configuration: {0}")]
    Config(String),
}

impl ChatError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
