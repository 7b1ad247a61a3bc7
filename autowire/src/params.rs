//! Explicit parameter overrides and the argument list handed to constructors.

use crate::error::{Error, Result};
use crate::Instance;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Values supplied by a caller for named constructor parameters.
///
/// A set of parameters applies to the object built by a single `make` call.
/// Dependencies resolved automatically while building that object never see
/// it.
#[derive(Clone, Default)]
pub struct Parameters {
  values: HashMap<String, Instance>,
}

impl Parameters {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an override, consuming and returning `self` for chaining.
  pub fn with<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
    self.insert(name, Arc::new(value));
    self
  }

  /// Adds an already shared value, e.g. an existing service.
  pub fn with_instance(mut self, name: &str, value: Instance) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: &str, value: Instance) {
    self.values.insert(name.to_owned(), value);
  }

  pub fn get(&self, name: &str) -> Option<&Instance> {
    self.values.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl fmt::Debug for Parameters {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
    names.sort_unstable();
    f.debug_struct("Parameters").field("names", &names).finish()
  }
}

/// The assembled, declaration-ordered arguments for one constructor call.
pub struct Arguments {
  owner: String,
  values: Vec<(String, Instance)>,
}

impl Arguments {
  pub(crate) fn new(owner: &str, values: Vec<(String, Instance)>) -> Self {
    Self {
      owner: owner.to_owned(),
      values,
    }
  }

  /// The id of the type being constructed.
  pub fn owner(&self) -> &str {
    &self.owner
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Returns the raw argument at `index`, in declaration order.
  pub fn at(&self, index: usize) -> Option<&Instance> {
    self.values.get(index).map(|(_, value)| value)
  }

  /// Returns the argument bound to parameter `name` as a shared `T`.
  pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    let value = self.raw(name)?;
    Arc::clone(value)
      .downcast::<T>()
      .map_err(|_| Error::type_mismatch::<T>(self.param_id(name)))
  }

  /// Returns a copy of the argument bound to parameter `name`.
  pub fn value<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<T> {
    let value = self.raw(name)?;
    value
      .downcast_ref::<T>()
      .cloned()
      .ok_or_else(|| Error::type_mismatch::<T>(self.param_id(name)))
  }

  fn raw(&self, name: &str) -> Result<&Instance> {
    self
      .values
      .iter()
      .find(|(param, _)| param == name)
      .map(|(_, value)| value)
      .ok_or_else(|| {
        Error::resolution(
          &self.owner,
          format!("constructor has no parameter named [{}]", name),
        )
      })
  }

  fn param_id(&self, name: &str) -> String {
    format!("{}::{}", self.owner, name)
  }
}
