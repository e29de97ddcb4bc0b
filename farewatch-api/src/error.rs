use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farewatch_core::replies;
use farewatch_shared::ChatReply;

#[derive(Debug)]
pub enum AppError {
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Anyhow(err) = self;
        tracing::error!("Internal Server Error: {:#}", err);

        apology()
    }
}

/// Fixed 500 body, shaped like a normal chat reply.
pub fn apology() -> Response {
    let body = Json(ChatReply::text(replies::SERVICE_UNAVAILABLE));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
