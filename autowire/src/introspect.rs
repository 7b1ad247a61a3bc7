//! Constructor introspection: how the container learns what a type needs.
//!
//! Rust has no runtime reflection, so every constructible type describes its
//! constructor up front, either by implementing [`Autowire`] or through
//! [`TypeRegistry::register_with`]. The container only ever talks to the
//! [`Introspect`] trait.

use crate::error::{Error, Result};
use crate::params::Arguments;
use crate::Instance;
use dashmap::{DashMap, DashSet};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Boxed constructor stored for a registered type.
pub type Constructor = Arc<dyn Fn(Arguments) -> Result<Instance> + Send + Sync>;

/// Answers "how is `id` constructed?" for the resolution engine.
pub trait Introspect: Send + Sync {
  /// Returns the constructor description of `id`, or a
  /// [`Error::Resolution`] if `id` is unknown or not instantiable.
  fn describe(&self, id: &str) -> Result<Arc<TypeInfo>>;
}

impl<I: Introspect + ?Sized> Introspect for Arc<I> {
  fn describe(&self, id: &str) -> Result<Arc<TypeInfo>> {
    (**self).describe(id)
  }
}

/// One constructor parameter, in declaration order.
#[derive(Clone)]
pub struct Parameter {
  name: String,
  dependency: Option<String>,
  default: Option<Instance>,
  registrar: Option<fn(&TypeRegistry, &mut HashSet<&'static str>)>,
}

impl Parameter {
  /// A parameter whose value is the service registered for `T`.
  pub fn of<T: Autowire>(name: &str) -> Self {
    Self {
      name: name.to_owned(),
      dependency: Some(T::id().to_owned()),
      default: None,
      registrar: Some(TypeRegistry::register_visiting::<T>),
    }
  }

  /// A parameter whose value is resolved from an arbitrary abstract id.
  pub fn typed(name: &str, dependency: &str) -> Self {
    Self {
      name: name.to_owned(),
      dependency: Some(dependency.to_owned()),
      default: None,
      registrar: None,
    }
  }

  /// A plain value parameter. It can only be filled by an explicit
  /// override or by its default.
  pub fn value(name: &str) -> Self {
    Self {
      name: name.to_owned(),
      dependency: None,
      default: None,
      registrar: None,
    }
  }

  /// Used when no override is supplied and no dependency type is declared.
  pub fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
    self.default = Some(Arc::new(value));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn dependency(&self) -> Option<&str> {
    self.dependency.as_deref()
  }

  pub fn default_value(&self) -> Option<&Instance> {
    self.default.as_ref()
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("dependency", &self.dependency)
      .field("has_default", &self.default.is_some())
      .finish()
  }
}

/// The constructor signature of one instantiable type.
pub struct TypeInfo {
  id: String,
  parameters: Vec<Parameter>,
  constructor: Constructor,
}

impl TypeInfo {
  pub fn new(id: &str, parameters: Vec<Parameter>, constructor: Constructor) -> Self {
    Self {
      id: id.to_owned(),
      parameters,
      constructor,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub fn construct(&self, args: Arguments) -> Result<Instance> {
    (self.constructor)(args)
  }
}

impl fmt::Debug for TypeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeInfo")
      .field("id", &self.id)
      .field("parameters", &self.parameters)
      .finish_non_exhaustive()
  }
}

/// A type that can describe and run its own constructor.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{Arguments, Autowire, Parameter, Result};
/// use std::sync::Arc;
///
/// struct Engine;
/// impl Autowire for Engine {
///   fn construct(_: Arguments) -> Result<Self> {
///     Ok(Engine)
///   }
/// }
///
/// struct Car {
///   engine: Arc<Engine>,
/// }
/// impl Autowire for Car {
///   fn parameters() -> Vec<Parameter> {
///     vec![Parameter::of::<Engine>("engine")]
///   }
///   fn construct(args: Arguments) -> Result<Self> {
///     Ok(Car { engine: args.get("engine")? })
///   }
/// }
/// ```
pub trait Autowire: Any + Send + Sync + Sized {
  /// The abstract id this type is registered and requested under.
  fn id() -> &'static str {
    std::any::type_name::<Self>()
  }

  fn parameters() -> Vec<Parameter> {
    Vec::new()
  }

  fn construct(args: Arguments) -> Result<Self>;
}

/// The default [`Introspect`] implementation: a concurrent map of type
/// descriptions populated at runtime.
#[derive(Default)]
pub struct TypeRegistry {
  types: DashMap<String, Arc<TypeInfo>>,
  abstracts: DashSet<String>,
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `T` together with every `Autowire` type its parameters name.
  /// Registering an already known type is a no-op.
  pub fn register<T: Autowire>(&self) {
    self.register_visiting::<T>(&mut HashSet::new());
  }

  // Dependencies are inserted before their dependents, so a type that is
  // visible in the registry always has its whole parameter closure registered.
  fn register_visiting<T: Autowire>(&self, visited: &mut HashSet<&'static str>) {
    let id = T::id();
    if self.types.contains_key(id) || !visited.insert(id) {
      return;
    }

    let parameters = T::parameters();
    for parameter in &parameters {
      if let Some(register) = parameter.registrar {
        register(self, visited);
      }
    }

    let constructor: Constructor =
      Arc::new(|args: Arguments| T::construct(args).map(|value| Arc::new(value) as Instance));
    self.insert(TypeInfo::new(id, parameters, constructor));
  }

  /// Registers (or replaces) a type described at runtime.
  pub fn register_with(
    &self,
    id: &str,
    parameters: Vec<Parameter>,
    constructor: impl Fn(Arguments) -> Result<Instance> + Send + Sync + 'static,
  ) {
    self.insert(TypeInfo::new(id, parameters, Arc::new(constructor)));
  }

  /// Marks `id` as a contract that cannot be built without a binding.
  pub fn declare_abstract(&self, id: &str) {
    self.types.remove(id);
    self.abstracts.insert(id.to_owned());
    tracing::debug!(id, "declared abstract type");
  }

  pub fn contains(&self, id: &str) -> bool {
    self.types.contains_key(id)
  }

  fn insert(&self, info: TypeInfo) {
    tracing::debug!(id = info.id(), parameters = info.parameters().len(), "registered type");
    self.abstracts.remove(info.id());
    self.types.insert(info.id().to_owned(), Arc::new(info));
  }
}

impl Introspect for TypeRegistry {
  fn describe(&self, id: &str) -> Result<Arc<TypeInfo>> {
    if let Some(info) = self.types.get(id) {
      return Ok(Arc::clone(info.value()));
    }
    if self.abstracts.contains(id) {
      return Err(Error::resolution(id, "target is not instantiable"));
    }
    Err(Error::resolution(id, "type does not exist"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Leaf;
  impl Autowire for Leaf {
    fn id() -> &'static str {
      "Leaf"
    }
    fn construct(_: Arguments) -> Result<Self> {
      Ok(Leaf)
    }
  }

  struct Branch;
  impl Autowire for Branch {
    fn id() -> &'static str {
      "Branch"
    }
    fn parameters() -> Vec<Parameter> {
      vec![Parameter::of::<Leaf>("leaf"), Parameter::value("size").with_default(3u32)]
    }
    fn construct(_: Arguments) -> Result<Self> {
      Ok(Branch)
    }
  }

  #[test]
  fn register_pulls_in_parameter_types() {
    let registry = TypeRegistry::new();
    registry.register::<Branch>();

    assert!(registry.contains("Branch"));
    assert!(registry.contains("Leaf"));

    let info = registry.describe("Branch").unwrap();
    let names: Vec<&str> = info.parameters().iter().map(Parameter::name).collect();
    assert_eq!(names, ["leaf", "size"]);
    assert_eq!(info.parameters()[0].dependency(), Some("Leaf"));
    assert!(info.parameters()[1].default_value().is_some());
  }

  #[test]
  fn describe_distinguishes_unknown_from_abstract() {
    let registry = TypeRegistry::new();
    registry.declare_abstract("Contract");

    let abstract_err = registry.describe("Contract").unwrap_err().to_string();
    let unknown_err = registry.describe("Nothing").unwrap_err().to_string();

    assert!(abstract_err.contains("not instantiable"), "{}", abstract_err);
    assert!(unknown_err.contains("does not exist"), "{}", unknown_err);
  }

  #[test]
  fn registering_a_concrete_type_clears_abstract_marker() {
    let registry = TypeRegistry::new();
    registry.declare_abstract("Leaf");
    registry.register::<Leaf>();

    assert!(registry.describe("Leaf").is_ok());
  }
}
