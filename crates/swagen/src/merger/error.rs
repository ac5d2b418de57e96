#[derive(Debug, thiserror::Error)]
pub enum MergeError {
  #[error("number of scopes ({scopes}) must equal number of documents ({documents})")]
  ScopeCountMismatch { documents: usize, scopes: usize },

  #[error("compress level must not be negative, got {0}")]
  NegativeCompressLevel(i32),

  #[error("invalid input '{0}': at most one '@' may separate scope and path")]
  MalformedScopedInput(String),

  #[error("unresolved reference '{reference}' in {location}")]
  UnresolvedReference { reference: String, location: String },

  #[error("failed to encode schema for fingerprinting: {0}")]
  Serialization(String),
}

pub type MergeResult<T> = Result<T, MergeError>;
