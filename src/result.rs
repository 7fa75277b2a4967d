use crate::error::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
