use fibre_autowire::{
  types, Arguments, Autowire, Concrete, Container, Error, Instance, Parameter, Parameters,
  Result,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

struct Bar;
impl Autowire for Bar {
  fn construct(_: Arguments) -> Result<Self> {
    Ok(Bar)
  }
}

#[derive(Default)]
struct Buz {
  foo: Mutex<Option<String>>,
}
impl Autowire for Buz {
  fn construct(_: Arguments) -> Result<Self> {
    Ok(Buz::default())
  }
}

struct Baz {
  buz: Arc<Buz>,
}
impl Autowire for Baz {
  fn parameters() -> Vec<Parameter> {
    vec![Parameter::of::<Buz>("buz")]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(Baz { buz: args.get("buz")? })
  }
}

struct Foo {
  bar: Arc<Bar>,
  baz: Arc<Baz>,
}
impl Autowire for Foo {
  fn parameters() -> Vec<Parameter> {
    vec![Parameter::of::<Bar>("bar"), Parameter::of::<Baz>("baz")]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(Foo {
      bar: args.get("bar")?,
      baz: args.get("baz")?,
    })
  }
}

struct Fox {
  fox: bool,
}
impl Autowire for Fox {
  fn parameters() -> Vec<Parameter> {
    vec![Parameter::value("fox")]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(Fox { fox: args.value("fox")? })
  }
}

// A dependency that itself declares a `flag` parameter, to check that
// overrides for the outer object do not reach it.
struct Switch {
  flag: bool,
}
impl Autowire for Switch {
  fn parameters() -> Vec<Parameter> {
    vec![Parameter::value("flag").with_default(false)]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(Switch { flag: args.value("flag")? })
  }
}

struct Panel {
  bar: Arc<Bar>,
  switch: Arc<Switch>,
  flag: bool,
}
impl Autowire for Panel {
  fn parameters() -> Vec<Parameter> {
    vec![
      Parameter::of::<Bar>("bar"),
      Parameter::of::<Switch>("switch"),
      Parameter::value("flag"),
    ]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(Panel {
      bar: args.get("bar")?,
      switch: args.get("switch")?,
      flag: args.value("flag")?,
    })
  }
}

static COUNTED_BUILDS: AtomicUsize = AtomicUsize::new(0);

struct Counted;
impl Autowire for Counted {
  fn construct(_: Arguments) -> Result<Self> {
    COUNTED_BUILDS.fetch_add(1, Ordering::SeqCst);
    Ok(Counted)
  }
}

fn container() -> Container {
  types().register::<Foo>();
  types().register::<Fox>();
  types().register::<Panel>();
  types().register::<Counted>();
  Container::new()
}

// --- Basic Tests ---

#[test]
fn test_foo_graph_is_autowired() {
  let container = container();

  let foo = container.make_type::<Foo>().unwrap();

  // Every level was built from constructor descriptions alone.
  let _bar: &Bar = &foo.bar;
  let _buz: &Buz = &foo.baz.buz;
  assert!(!container.resolved(Foo::id()));
  assert!(!container.has_binding(Foo::id()));
}

#[test]
fn test_unbound_ids_are_not_shared() {
  let container = container();

  let f1 = container.make_type::<Foo>().unwrap();
  let f2 = container.make_type::<Foo>().unwrap();

  assert!(!Arc::ptr_eq(&f1, &f2));
  assert!(!Arc::ptr_eq(&f1.baz.buz, &f2.baz.buz));
}

#[test]
fn test_explicit_parameter_fills_value() {
  let container = container();

  let fox = container
    .make_as_with::<Fox>(Fox::id(), &Parameters::new().with("fox", true))
    .unwrap();

  assert!(fox.fox);
}

#[test]
fn test_value_parameter_without_override_fails() {
  let container = container();

  let err = container.make(Fox::id()).unwrap_err();

  match err {
    Error::Resolution { id, reason } => {
      assert_eq!(id, Fox::id());
      assert!(reason.contains("[fox]"), "{}", reason);
    }
    other => panic!("unexpected error: {}", other),
  }
}

#[test]
fn test_override_is_scoped_to_requested_object() {
  let container = container();

  let panel = container
    .make_as_with::<Panel>(Panel::id(), &Parameters::new().with("flag", true))
    .unwrap();

  assert!(panel.flag);
  // `bar` had no override, so it was resolved normally.
  let _bar: &Bar = &panel.bar;
  // The nested `Switch` also declares `flag`, but only sees its default.
  assert!(!panel.switch.flag);
}

#[test]
fn test_override_can_replace_a_typed_dependency() {
  let container = container();
  let bar = Arc::new(Bar);

  let foo = container
    .make_as_with::<Foo>(
      Foo::id(),
      &Parameters::new().with_instance("bar", Arc::clone(&bar) as Instance),
    )
    .unwrap();

  assert!(Arc::ptr_eq(&foo.bar, &bar));
}

#[test]
fn test_singleton_factory_shares_mutations() {
  let container = container();
  container.singleton(
    Buz::id(),
    Some(Concrete::factory(|_, _| Ok(Arc::new(Buz::default()) as Instance))),
  );

  assert!(container.is_shared(Buz::id()));
  assert!(!container.resolved(Buz::id()));

  let b1 = container.make_as::<Buz>(Buz::id()).unwrap();
  *b1.foo.lock() = Some("foo".to_string());
  let b2 = container.make_as::<Buz>(Buz::id()).unwrap();

  assert!(Arc::ptr_eq(&b1, &b2));
  assert_eq!(b2.foo.lock().as_deref(), Some("foo"));
  assert!(container.resolved(Buz::id()));
}

#[test]
fn test_shared_dependency_is_reused_across_graphs() {
  let container = container();
  container.singleton(Buz::id(), None);

  let f1 = container.make_type::<Foo>().unwrap();
  let f2 = container.make_type::<Foo>().unwrap();

  assert!(!Arc::ptr_eq(&f1.baz, &f2.baz));
  assert!(Arc::ptr_eq(&f1.baz.buz, &f2.baz.buz));
}

#[test]
fn test_registered_instance_is_returned_without_construction() {
  let container = container();
  let before = COUNTED_BUILDS.load(Ordering::SeqCst);

  let registered = container.register_instance(Counted::id(), Counted);
  let made = container.make_type::<Counted>().unwrap();

  assert!(Arc::ptr_eq(&registered, &made));
  assert!(container.is_shared(Counted::id()));
  assert_eq!(COUNTED_BUILDS.load(Ordering::SeqCst), before);
}
