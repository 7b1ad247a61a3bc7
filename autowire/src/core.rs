//! Core, non-public data structures for the container, plus the public
//! binding strategy type.

use crate::config::ContainerConfig;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::params::Parameters;
use crate::Instance;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A user-supplied construction strategy.
pub type Factory = Arc<dyn Fn(&Container, &Parameters) -> Result<Instance> + Send + Sync>;

/// How a bound abstract id is turned into an instance.
#[derive(Clone)]
pub enum Concrete {
  /// Calls the factory with the container and the caller's explicit parameters.
  Factory(Factory),
  /// Builds the target directly when it equals the bound id, otherwise
  /// delegates resolution to the target id.
  Redirect(String),
}

impl Concrete {
  pub fn factory(
    factory: impl Fn(&Container, &Parameters) -> Result<Instance> + Send + Sync + 'static,
  ) -> Self {
    Concrete::Factory(Arc::new(factory))
  }

  pub fn redirect(target: &str) -> Self {
    Concrete::Redirect(target.to_owned())
  }
}

impl From<&str> for Concrete {
  fn from(target: &str) -> Self {
    Concrete::redirect(target)
  }
}

impl From<String> for Concrete {
  fn from(target: String) -> Self {
    Concrete::Redirect(target)
  }
}

impl fmt::Debug for Concrete {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Concrete::Factory(_) => f.write_str("Factory(..)"),
      Concrete::Redirect(target) => f.debug_tuple("Redirect").field(target).finish(),
    }
  }
}

#[derive(Debug)]
pub(crate) struct Binding {
  pub(crate) concrete: Concrete,
  pub(crate) shared: bool,
}

impl Binding {
  pub(crate) fn produce(
    &self,
    container: &Container,
    id: &str,
    parameters: &Parameters,
  ) -> Result<Instance> {
    match &self.concrete {
      Concrete::Factory(factory) => factory(container, parameters),
      Concrete::Redirect(target) if target == id => container.build_with(target, parameters),
      Concrete::Redirect(target) => container.resolve(target, parameters),
    }
  }
}

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_container_id() -> u64 {
  NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, PartialEq, Eq)]
struct BuildMarker {
  container: u64,
  id: String,
}

thread_local! {
  // Ids currently being resolved on this thread, outermost first.
  static BUILD_STACK: RefCell<Vec<BuildMarker>> = const { RefCell::new(Vec::new()) };
}

/// An RAII marker for an id whose construction is in flight.
///
/// Creating the guard pushes the id on the thread-local build stack and fails
/// if that would form a cycle or exceed the configured depth. Dropping it pops
/// the marker, so the stack unwinds correctly on both success and error.
pub(crate) struct BuildGuard {
  _private: (),
}

impl BuildGuard {
  pub(crate) fn enter(container: u64, id: &str, config: &ContainerConfig) -> Result<Self> {
    BUILD_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();

      if config.detect_cycles {
        if let Some(start) = stack
          .iter()
          .position(|marker| marker.container == container && marker.id == id)
        {
          let mut path: Vec<String> = stack[start..]
            .iter()
            .filter(|marker| marker.container == container)
            .map(|marker| marker.id.clone())
            .collect();
          path.push(id.to_owned());
          tracing::warn!(id, path = ?path, "circular dependency detected");
          return Err(Error::CircularDependency { path });
        }
      }

      if stack.len() >= config.max_depth {
        tracing::warn!(id, depth = stack.len(), "maximum build depth exceeded");
        return Err(Error::resolution(
          id,
          format!("maximum build depth of {} exceeded", config.max_depth),
        ));
      }

      stack.push(BuildMarker {
        container,
        id: id.to_owned(),
      });
      Ok(Self { _private: () })
    })
  }
}

impl Drop for BuildGuard {
  fn drop(&mut self) {
    BUILD_STACK.with(|stack| {
      stack.borrow_mut().pop();
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn depth() -> usize {
    BUILD_STACK.with(|stack| stack.borrow().len())
  }

  #[test]
  fn guard_pops_on_drop() {
    let config = ContainerConfig::default();
    {
      let _a = BuildGuard::enter(1, "A", &config).unwrap();
      let _b = BuildGuard::enter(1, "B", &config).unwrap();
      assert_eq!(depth(), 2);
    }
    assert_eq!(depth(), 0);
  }

  #[test]
  fn guard_reports_cycle_path() {
    let config = ContainerConfig::default();
    let _a = BuildGuard::enter(7, "A", &config).unwrap();
    let _b = BuildGuard::enter(7, "B", &config).unwrap();

    match BuildGuard::enter(7, "A", &config) {
      Err(Error::CircularDependency { path }) => assert_eq!(path, ["A", "B", "A"]),
      _ => panic!("expected a circular dependency error"),
    }
    assert_eq!(depth(), 2);
  }

  #[test]
  fn same_id_in_another_container_is_not_a_cycle() {
    let config = ContainerConfig::default();
    let _outer = BuildGuard::enter(1, "A", &config).unwrap();
    assert!(BuildGuard::enter(2, "A", &config).is_ok());
  }

  #[test]
  fn depth_limit_applies_without_cycle_detection() {
    let config = ContainerConfig {
      detect_cycles: false,
      max_depth: 2,
    };
    let _a = BuildGuard::enter(3, "A", &config).unwrap();
    let _b = BuildGuard::enter(3, "A", &config).unwrap();
    assert!(matches!(
      BuildGuard::enter(3, "A", &config),
      Err(Error::Resolution { .. })
    ));
  }
}
