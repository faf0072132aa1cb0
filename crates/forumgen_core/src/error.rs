use thiserror::Error;

/// Failure kinds the conversion pipeline surfaces to its caller.
///
/// `InvalidPageSize` is a configuration error and is raised before any
/// discussion is processed. `BadPostKey` is a shape error in one discussion
/// record and is terminal for that discussion's processing pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("posts per page must be 1 or more, got {0}")]
    InvalidPageSize(usize),
    #[error("post key {key:?} is not a numeric index")]
    BadPostKey { key: String },
}
