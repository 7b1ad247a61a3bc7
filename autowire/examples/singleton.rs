use fibre_autowire::{global, resolve, types, Arguments, Autowire, Result};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl Autowire for RequestTracker {
  fn id() -> &'static str {
    "tracker"
  }
  fn construct(_: Arguments) -> Result<Self> {
    println!("Constructing RequestTracker...");
    Ok(RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    })
  }
}

fn main() -> Result<()> {
  types().register::<RequestTracker>();

  // --- Shared Binding ---
  // The constructor runs once; later resolutions hit the instance cache.
  global().singleton("singleton_tracker", Some("tracker".into()));

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(RequestTracker, "singleton_tracker");
  let s2 = resolve!(RequestTracker, "singleton_tracker");
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "Singleton instances should be identical"
  );

  // --- Unbound Type ---
  // Without a binding every resolution constructs a fresh instance.
  println!("--- Resolving Transients ---");
  let t1 = resolve!(RequestTracker);
  let t2 = resolve!(RequestTracker);
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert!(
    !Arc::ptr_eq(&t1, &t2),
    "Transient instances should be different"
  );

  println!("Is 'singleton_tracker' shared? {}", global().is_shared("singleton_tracker"));
  Ok(())
}
