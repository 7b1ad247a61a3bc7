//! The process-wide container and type registry.

use crate::container::Container;
use crate::error::Result;
use crate::introspect::{Introspect, TypeInfo, TypeRegistry};
use once_cell::sync::Lazy;
use std::sync::Arc;

// Created on first access in a thread-safe manner.
static GLOBAL_TYPES: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::default);
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Introspects through the global registry; the default for new containers.
pub(crate) struct GlobalTypes;

impl Introspect for GlobalTypes {
  fn describe(&self, id: &str) -> Result<Arc<TypeInfo>> {
    types().describe(id)
  }
}

/// Provides a reference to the global type registry.
///
/// Every [`Container`] created with [`Container::new`] or
/// [`Container::with_config`] describes types through this registry.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{types, Arguments, Autowire, Result};
///
/// struct Clock;
/// impl Autowire for Clock {
///   fn construct(_: Arguments) -> Result<Self> {
///     Ok(Clock)
///   }
/// }
///
/// types().register::<Clock>();
/// assert!(types().contains(Clock::id()));
/// ```
pub fn types() -> &'static TypeRegistry {
  &GLOBAL_TYPES
}

/// Provides a reference to the global container instance.
///
/// # Examples
///
/// ```
/// use fibre_autowire::global;
///
/// fn register_services() {
///   global().register_instance("greeting", String::from("Hello from global!"));
/// }
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}
