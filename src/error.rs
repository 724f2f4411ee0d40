use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure, used when reporting errors at the command boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The wallet home or its config file is missing or invalid.
    Config,
    /// The REST API could not be reached or returned an unexpected status.
    Api,
    /// The REST API rejected the stored access token.
    Auth,
    /// A statement payload could not be parsed.
    Payload,
    /// The summary could not be built from the statement.
    Summary,
    /// Writing output failed.
    Output,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error tagged with its `ErrorType`.
pub struct CategorizedError {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl CategorizedError {
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for CategorizedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for CategorizedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for CategorizedError {}

/// Tags the error side of a result with an `ErrorType` before it leaves a public function.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            // Keep the innermost category if one was already assigned.
            if inner.downcast_ref::<CategorizedError>().is_some() {
                return inner;
            }
            CategorizedError { error_type, inner }.into()
        })
    }
}

/// Returns the category of `error`, if one was assigned.
pub fn error_type(error: &Error) -> Option<ErrorType> {
    error
        .downcast_ref::<CategorizedError>()
        .map(CategorizedError::error_type)
}
