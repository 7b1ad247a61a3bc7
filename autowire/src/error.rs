use thiserror::Error;

/// The error type for every fallible container operation.
#[derive(Debug, Error)]
pub enum Error {
  /// Invalid static configuration, rejected at registration time.
  #[error("Invalid container configuration: {0}")]
  Configuration(String),

  /// A type could not be introspected, instantiated or wired.
  #[error("Unable to resolve [{id}]: {reason}")]
  Resolution { id: String, reason: String },

  /// A produced or supplied value is not of the requested Rust type.
  #[error("Type mismatch for [{id}]: expected {expected}")]
  TypeMismatch { id: String, expected: &'static str },

  /// A type (transitively) depends on itself.
  #[error("Circular dependency detected: {}", .path.join(" -> "))]
  CircularDependency { path: Vec<String> },
}

impl Error {
  pub(crate) fn resolution(id: impl Into<String>, reason: impl Into<String>) -> Self {
    Error::Resolution {
      id: id.into(),
      reason: reason.into(),
    }
  }

  /// Builds the error a constructor should return when it refuses its arguments.
  pub fn construction(id: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::resolution(id, reason)
  }

  pub(crate) fn type_mismatch<T: ?Sized>(id: impl Into<String>) -> Self {
    Error::TypeMismatch {
      id: id.into(),
      expected: std::any::type_name::<T>(),
    }
  }
}

/// A specialized `Result` type for `fibre_autowire` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
