//! The main `Container` struct and its associated methods.

use crate::config::ContainerConfig;
use crate::core::{next_container_id, Binding, BuildGuard, Concrete};
use crate::error::{Error, Result};
use crate::global::{types, GlobalTypes};
use crate::introspect::{Autowire, Introspect, Parameter};
use crate::params::{Arguments, Parameters};
use crate::Instance;
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The Inversion of Control (IoC) container.
///
/// Maps abstract ids to construction strategies and builds fully wired object
/// graphs on demand. Ids without a binding are built straight from their
/// constructor description, recursively resolving each parameter.
///
/// All registries are concurrent maps, so a `Container` can be shared between
/// threads. Explicit parameters travel down the call chain instead of living
/// on shared state, which keeps concurrent `make` calls independent.
pub struct Container {
  id: u64,
  config: ContainerConfig,
  introspector: Arc<dyn Introspect>,
  // Set when `introspector` is the process-wide registry, which `make_type`
  // may extend on demand.
  global_types: bool,
  aliases: DashMap<String, String>,
  bindings: DashMap<String, Arc<Binding>>,
  instances: DashMap<String, Instance>,
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates an empty container backed by the process-wide
  /// [`types()`](crate::types) registry.
  pub fn new() -> Self {
    Self::with_config(ContainerConfig::default())
  }

  pub fn with_config(config: ContainerConfig) -> Self {
    let mut container = Self::with_introspector(GlobalTypes, config);
    container.global_types = true;
    container
  }

  /// Creates a container that describes types through `introspector`.
  pub fn with_introspector(introspector: impl Introspect + 'static, config: ContainerConfig) -> Self {
    Self {
      id: next_container_id(),
      config,
      introspector: Arc::new(introspector),
      global_types: false,
      aliases: DashMap::new(),
      bindings: DashMap::new(),
      instances: DashMap::new(),
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- PRIVATE HELPERS ---

  fn canonical(&self, id: &str) -> String {
    self
      .aliases
      .get(id)
      .map(|target| target.value().clone())
      .unwrap_or_else(|| id.to_owned())
  }

  fn is_shared_canonical(&self, id: &str) -> bool {
    self.instances.contains_key(id)
      || self
        .bindings
        .get(id)
        .map_or(false, |binding| binding.shared)
  }

  fn resolve_parameter(&self, owner: &str, parameter: &Parameter) -> Result<Instance> {
    match (parameter.dependency(), parameter.default_value()) {
      (Some(dependency), _) => self.resolve(dependency, &Parameters::new()),
      (None, Some(default)) => Ok(Arc::clone(default)),
      (None, None) => Err(Error::resolution(
        owner,
        format!(
          "unresolvable dependency [{}] declares no type and has no default",
          parameter.name()
        ),
      )),
    }
  }

  // Caches `instance` only while `binding` is still the one registered for
  // `id`. A rebind that lands mid-construction must not be shadowed by the
  // replaced binding's product.
  fn store_shared(&self, id: String, binding: &Arc<Binding>, instance: Instance) -> Instance {
    match self.bindings.get(&id) {
      Some(current) if Arc::ptr_eq(current.value(), binding) => {
        // A concurrent resolution may have stored first; everyone gets that one.
        Arc::clone(self.instances.entry(id).or_insert(instance).value())
      }
      _ => {
        tracing::debug!(id = %id, "binding replaced during construction, result not cached");
        instance
      }
    }
  }

  // --- PUBLIC API ---

  // --- Aliases ---

  /// Registers `alias` as a second name for `abstract_id`.
  pub fn alias(&self, abstract_id: &str, alias: &str) -> Result<()> {
    if alias == abstract_id {
      return Err(Error::Configuration(format!(
        "[{}] is aliased to itself",
        abstract_id
      )));
    }
    tracing::debug!(alias, abstract_id, "registered alias");
    self.aliases.insert(alias.to_owned(), abstract_id.to_owned());
    Ok(())
  }

  /// Returns what `id` points at, or `id` itself if it is not an alias.
  /// Only one level of aliasing is followed.
  pub fn alias_target(&self, id: &str) -> String {
    self.canonical(id)
  }

  pub fn is_alias(&self, id: &str) -> bool {
    self.aliases.contains_key(id)
  }

  // --- Bindings ---

  /// Registers a construction strategy for `abstract_id`.
  ///
  /// `None` binds the id to itself. Any instance cached for the id and any
  /// alias of the same name are dropped.
  pub fn bind(&self, abstract_id: &str, concrete: Option<Concrete>, shared: bool) {
    let concrete = concrete.unwrap_or_else(|| Concrete::redirect(abstract_id));
    tracing::debug!(id = abstract_id, ?concrete, shared, "registered binding");
    self.aliases.remove(abstract_id);
    // The new binding goes in before the cache is cleared, so an in-flight
    // resolution of the old binding either stores ahead of the clear or sees
    // that it was replaced.
    self
      .bindings
      .insert(abstract_id.to_owned(), Arc::new(Binding { concrete, shared }));
    self.instances.remove(abstract_id);
  }

  /// Shorthand for [`bind`](Self::bind) with `shared = true`.
  pub fn singleton(&self, abstract_id: &str, concrete: Option<Concrete>) {
    self.bind(abstract_id, concrete, true);
  }

  /// Binds `abstract_id` to a factory closure.
  pub fn bind_factory(
    &self,
    abstract_id: &str,
    shared: bool,
    factory: impl Fn(&Container, &Parameters) -> Result<Instance> + Send + Sync + 'static,
  ) {
    self.bind(abstract_id, Some(Concrete::factory(factory)), shared);
  }

  pub fn has_binding(&self, abstract_id: &str) -> bool {
    self.bindings.contains_key(abstract_id)
  }

  /// True if an instance is cached for the id, or its binding is shared.
  pub fn is_shared(&self, abstract_id: &str) -> bool {
    self.is_shared_canonical(&self.canonical(abstract_id))
  }

  // --- Instances ---

  /// Stores a ready-made shared instance and returns it.
  pub fn register_instance<T: Any + Send + Sync>(&self, abstract_id: &str, instance: T) -> Arc<T> {
    let instance = Arc::new(instance);
    self.register_shared(abstract_id, Arc::clone(&instance) as Instance);
    instance
  }

  /// Stores an already shared instance and returns it.
  pub fn register_shared(&self, abstract_id: &str, instance: Instance) -> Instance {
    self.aliases.remove(abstract_id);
    tracing::debug!(id = abstract_id, "registered instance");
    self
      .instances
      .insert(abstract_id.to_owned(), Arc::clone(&instance));
    instance
  }

  /// True if an instance is cached for the (canonical) id.
  pub fn resolved(&self, abstract_id: &str) -> bool {
    self.instances.contains_key(&self.canonical(abstract_id))
  }

  /// Drops the cached instance for `abstract_id`, returning it if present.
  pub fn forget_instance(&self, abstract_id: &str) -> Option<Instance> {
    self
      .instances
      .remove(&self.canonical(abstract_id))
      .map(|(_, instance)| instance)
  }

  /// Clears every alias, binding and cached instance.
  pub fn flush(&self) {
    tracing::debug!(
      aliases = self.aliases.len(),
      bindings = self.bindings.len(),
      instances = self.instances.len(),
      "flushing container"
    );
    self.aliases.clear();
    self.bindings.clear();
    self.instances.clear();
  }

  // --- Resolution ---

  /// Resolves `abstract_id` with no explicit parameters.
  pub fn make(&self, abstract_id: &str) -> Result<Instance> {
    self.resolve(abstract_id, &Parameters::new())
  }

  /// Resolves `abstract_id`, filling same-named constructor parameters of the
  /// requested object from `parameters`.
  pub fn make_with(&self, abstract_id: &str, parameters: &Parameters) -> Result<Instance> {
    self.resolve(abstract_id, parameters)
  }

  pub fn make_as<T: Any + Send + Sync>(&self, abstract_id: &str) -> Result<Arc<T>> {
    self.make_as_with(abstract_id, &Parameters::new())
  }

  pub fn make_as_with<T: Any + Send + Sync>(
    &self,
    abstract_id: &str,
    parameters: &Parameters,
  ) -> Result<Arc<T>> {
    self
      .resolve(abstract_id, parameters)?
      .downcast::<T>()
      .map_err(|_| Error::type_mismatch::<T>(abstract_id))
  }

  /// Resolves the service registered under `T`'s own id.
  ///
  /// Containers backed by the global [`types()`] registry register `T` (and
  /// its `Parameter::of` dependencies) on first use. Containers built with
  /// [`with_introspector`](Self::with_introspector) must already describe `T`.
  pub fn make_type<T: Autowire>(&self) -> Result<Arc<T>> {
    if self.global_types {
      types().register::<T>();
    }
    self.make_as::<T>(T::id())
  }

  /// The resolution engine.
  ///
  /// Follows one alias hop, returns a cached instance if there is one, and
  /// otherwise runs the id's binding or builds it directly. The result is
  /// cached when the id is shared. Nothing is cached if any step fails.
  pub fn resolve(&self, abstract_id: &str, parameters: &Parameters) -> Result<Instance> {
    let id = self.canonical(abstract_id);

    let cached = self
      .instances
      .get(&id)
      .map(|instance| Arc::clone(instance.value()));
    if let Some(instance) = cached {
      tracing::trace!(id = %id, "instance cache hit");
      return Ok(instance);
    }

    let _guard = BuildGuard::enter(self.id, &id, &self.config)?;

    let binding = self
      .bindings
      .get(&id)
      .map(|binding| Arc::clone(binding.value()));
    match binding {
      Some(binding) => {
        tracing::trace!(id = %id, "resolving through binding");
        let instance = binding.produce(self, &id, parameters)?;
        if binding.shared {
          return Ok(self.store_shared(id, &binding, instance));
        }
        Ok(instance)
      }
      None => self.build_with(&id, parameters),
    }
  }

  /// Constructs `id` from its constructor description with no overrides.
  pub fn build(&self, id: &str) -> Result<Instance> {
    self.build_with(id, &Parameters::new())
  }

  /// Constructs `id` directly, ignoring bindings and the instance cache.
  ///
  /// Each constructor parameter is taken verbatim from `parameters` if a
  /// value of the same name is present; otherwise its declared dependency is
  /// resolved with no explicit parameters.
  pub fn build_with(&self, id: &str, parameters: &Parameters) -> Result<Instance> {
    let info = self.introspector.describe(id)?;

    if info.parameters().is_empty() {
      tracing::trace!(id, "building without dependencies");
      return info.construct(Arguments::new(id, Vec::new()));
    }

    let mut values = Vec::with_capacity(info.parameters().len());
    for parameter in info.parameters() {
      let value = match parameters.get(parameter.name()) {
        Some(value) => Arc::clone(value),
        None => self.resolve_parameter(id, parameter)?,
      };
      values.push((parameter.name().to_owned(), value));
    }

    tracing::trace!(id, arguments = values.len(), "building");
    info.construct(Arguments::new(id, values))
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("id", &self.id)
      .field("config", &self.config)
      .field("global_types", &self.global_types)
      .field("aliases", &self.aliases.len())
      .field("bindings", &self.bindings.len())
      .field("instances", &self.instances.len())
      .finish()
  }
}
