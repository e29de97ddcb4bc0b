pub mod airports;
pub mod completion;
pub mod intent;
pub mod replies;

pub use completion::{CompletionError, CompletionRequest, TextCompletion};
pub use intent::{is_flight_query, FieldExtractor, FillPolicy};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
