use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("{0}")] Validation(String),
    #[error("OpenAI Error: {0}")] Parse(String),
    #[error("rewrite response is missing the `{0}` field")] MissingField(String),
    #[error("OpenAI Error: {0}")] Completion(String),
    #[error("storage error: {0}")] Persistence(String),
    #[error("clipboard error: {0}")] Clipboard(String),
    #[error("configuration error: {0}")] Config(String),
    #[error("another generation or rewrite is still in progress")] Busy,
    #[error("there is no generated output to rewrite")] NoOutput,
}

pub type Result<T> = std::result::Result<T, ListingError>;
