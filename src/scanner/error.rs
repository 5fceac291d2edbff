//! Scanner error types
//!
//! Error types returned by the decoder and resolver collaborators. All of
//! them are absorbed at the bridge boundary; none reaches the registry or
//! the user path.

/// Error type for barcode decode operations
#[derive(Debug, Clone)]
pub enum DecodeError {
    /// Frame could not be interpreted as an image
    InvalidFrame(String),
    /// The underlying decoder backend failed
    Backend(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidFrame(reason) => write!(f, "Invalid frame: {}", reason),
            DecodeError::Backend(reason) => write!(f, "Decoder backend failed: {}", reason),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Error type for profile resolution operations
///
/// A missing profile is not an error; resolvers report that as `Ok(None)`.
#[derive(Debug, Clone)]
pub enum ResolveError {
    /// The backing store failed the lookup
    Store(String),
    /// The resolver is not available (e.g. store shut down)
    Unavailable,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Store(reason) => write!(f, "Profile lookup failed: {}", reason),
            ResolveError::Unavailable => write!(f, "Profile resolver unavailable"),
        }
    }
}

impl std::error::Error for ResolveError {}
