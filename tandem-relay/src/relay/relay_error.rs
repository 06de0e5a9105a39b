use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("relay at capacity ({max} connections)")]
    AtCapacity { max: usize },
}
