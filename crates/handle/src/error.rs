use thiserror::Error;

/// The error returned when a handle is accessed without a managed object
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleError {
    /// The handle is empty
    #[error("no managed object")]
    Empty,
}

/// The Result type used by fallible handle accessors
pub type Result<T> = std::result::Result<T, HandleError>;
