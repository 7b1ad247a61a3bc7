//! Public macros for ergonomic service resolution.

/// Resolves a service from the global container as a concrete type.
///
/// - `resolve!(Type)` resolves the id declared by `Type`'s
///   [`Autowire`](crate::Autowire) implementation.
/// - `resolve!(Type, "id")` resolves an arbitrary id and downcasts to `Type`.
/// - `resolve!(Type, "id", params)` additionally passes explicit
///   [`Parameters`](crate::Parameters).
///
/// # Panics
///
/// Panics if the service cannot be resolved or is not a `Type`. For a
/// non-panicking version, use `global().make_as(...)` directly.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{resolve, types, Arguments, Autowire, Parameter, Parameters, Result};
///
/// struct Fox {
///   fox: bool,
/// }
///
/// impl Autowire for Fox {
///   fn id() -> &'static str {
///     "doc::Fox"
///   }
///   fn parameters() -> Vec<Parameter> {
///     vec![Parameter::value("fox")]
///   }
///   fn construct(args: Arguments) -> Result<Self> {
///     Ok(Fox { fox: args.value("fox")? })
///   }
/// }
///
/// types().register::<Fox>();
///
/// let fox = resolve!(Fox, "doc::Fox", &Parameters::new().with("fox", true));
/// assert!(fox.fox);
/// ```
#[macro_export]
macro_rules! resolve {
    ($type:ty) => {
        $crate::global()
            .make_type::<$type>()
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to resolve required service {}: {}",
                    std::any::type_name::<$type>(),
                    e
                )
            })
    };

    ($type:ty, $id:expr) => {
        $crate::global()
            .make_as::<$type>($id)
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to resolve required service '{}' as {}: {}",
                    $id,
                    std::any::type_name::<$type>(),
                    e
                )
            })
    };

    ($type:ty, $id:expr, $params:expr) => {
        $crate::global()
            .make_as_with::<$type>($id, $params)
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to resolve required service '{}' as {}: {}",
                    $id,
                    std::any::type_name::<$type>(),
                    e
                )
            })
    };
}
