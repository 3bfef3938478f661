//! Convenience result type alias for AnimeStream.

use crate::error::AppError;

/// A specialized `Result` type for AnimeStream operations.
pub type AppResult<T> = Result<T, AppError>;
