//! # Fibre Autowire
//!
//! A string-keyed Inversion of Control (IoC) container for Rust that builds
//! fully wired object graphs by inspecting constructor signatures.
//!
//! ## Core Concepts
//!
//! - **Container**: maps abstract ids to bindings and builds instances on demand.
//! - **Autowiring**: an id without a binding is built from its constructor
//!   description, resolving every parameter recursively.
//! - **Bindings**: a factory closure or a redirect to another id, optionally shared.
//! - **Aliases**: a second name for an id, followed exactly one hop.
//! - **Parameters**: explicit values for the named constructor parameters of
//!   the object being made. They never leak into its dependencies.
//! - **Types**: constructible types describe themselves through [`Autowire`]
//!   and are registered with [`types()`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_autowire::{types, Arguments, Autowire, Container, Parameter, Result};
//! use std::sync::Arc;
//!
//! struct Database;
//! impl Autowire for Database {
//!   fn id() -> &'static str {
//!     "app.database"
//!   }
//!   fn construct(_: Arguments) -> Result<Self> {
//!     Ok(Database)
//!   }
//! }
//!
//! struct UserService {
//!   db: Arc<Database>,
//!   page_size: u32,
//! }
//! impl Autowire for UserService {
//!   fn id() -> &'static str {
//!     "app.users"
//!   }
//!   fn parameters() -> Vec<Parameter> {
//!     vec![
//!       Parameter::of::<Database>("db"),
//!       Parameter::value("page_size").with_default(20u32),
//!     ]
//!   }
//!   fn construct(args: Arguments) -> Result<Self> {
//!     Ok(UserService {
//!       db: args.get("db")?,
//!       page_size: args.value("page_size")?,
//!     })
//!   }
//! }
//!
//! fn main() -> Result<()> {
//!   // Registering a type also registers the types its parameters name.
//!   types().register::<UserService>();
//!
//!   let container = Container::new();
//!   container.singleton("app.database", None);
//!
//!   let users = container.make_type::<UserService>()?;
//!   assert_eq!(users.page_size, 20);
//!   assert!(Arc::ptr_eq(&users.db, &container.make_type::<Database>()?));
//!   Ok(())
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

mod config;
mod container;
mod core;
mod error;
mod global;
mod introspect;
mod macros;
mod params;

pub use config::ContainerConfig;
pub use container::Container;
pub use crate::core::{Concrete, Factory};
pub use error::{Error, Result};
pub use global::{global, types};
pub use introspect::{Autowire, Constructor, Introspect, Parameter, TypeInfo, TypeRegistry};
pub use params::{Arguments, Parameters};

/// A constructed object as stored and handed out by the container.
pub type Instance = Arc<dyn Any + Send + Sync>;
