//! Runtime knobs for a [`Container`](crate::Container).

use serde::Deserialize;

const DEFAULT_MAX_DEPTH: usize = 128;

/// Settings that bound the resolution engine.
///
/// Deserializable so applications can embed it in their own configuration
/// files; every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
  /// Fail with [`Error::CircularDependency`](crate::Error::CircularDependency)
  /// when an id is requested again while it is still being built.
  pub detect_cycles: bool,
  /// Maximum nesting of in-flight resolutions on one thread.
  pub max_depth: usize,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      detect_cycles: true,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}
