use crate::repository;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("notification not exist")]
    NotificationNotExist,

    #[error("validation error: {0}")]
    Validation(&'static str),

    #[error("validation error: message too long {len}/{max_len}")]
    ValidationMessageTooLong { len: usize, max_len: usize },

    #[error("auth error: missing role")]
    MissingRole,

    #[error("websocket auth error: missing token")]
    TokenMissing,

    #[error("websocket auth error: {0}")]
    TokenInvalid(&'static str),

    #[error("database error: {0}")]
    Database(#[from] repository::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::warn!(err = %self);

        match self {
            Error::NotificationNotExist => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ValidationMessageTooLong { len: _, max_len: _ } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::MissingRole => StatusCode::FORBIDDEN,
            Error::TokenMissing | Error::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
        .into_response()
    }
}
