use axum::http::StatusCode;
use axum::response::IntoResponse;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error(transparent)]
    Email(#[from] lettre::error::Error),

    #[error(transparent)]
    Address(#[from] lettre::address::AddressError),

    #[error(transparent)]
    ApiError(#[from] ApiError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Sqlx(e) => {
                tracing::error!(%e, "sqlx error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            Error::Smtp(e) => {
                tracing::error!(%e, "smtp relay error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway")
            }
            .into_response(),
            Error::Email(e) => {
                tracing::error!(%e, "message build error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            Error::Address(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Error::ApiError(api_error) => match api_error {
                ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
            },
        }
    }
}
