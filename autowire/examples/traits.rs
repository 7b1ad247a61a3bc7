use fibre_autowire::{
  types, Arguments, Autowire, Concrete, Container, Instance, Parameter, Result,
};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<Box<dyn Logger>>,
}

impl Autowire for ReportService {
  fn id() -> &'static str {
    "report_service"
  }
  fn parameters() -> Vec<Parameter> {
    vec![Parameter::typed("logger", "logger")]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(ReportService {
      logger: args.get("logger")?,
    })
  }
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() -> Result<()> {
  types().register::<ReportService>();
  types().declare_abstract("logger");

  let container = Container::new();

  // Without a binding the contract cannot be built.
  if let Err(e) = container.make("report_service") {
    println!("Before binding: {}", e);
  }

  // Bind the contract to a factory producing the concrete logger.
  container.singleton(
    "logger",
    Some(Concrete::factory(|_, _| {
      Ok(Arc::new(Box::new(ConsoleLogger) as Box<dyn Logger>) as Instance)
    })),
  );

  let report_service = container.make_as::<ReportService>("report_service")?;
  report_service.generate_report();
  Ok(())
}
