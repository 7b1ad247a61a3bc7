use fibre_autowire::{types, Arguments, Autowire, Container, Parameter, Parameters, Result};
use std::sync::Arc;

struct Connection {
  url: String,
}

impl Autowire for Connection {
  fn id() -> &'static str {
    "connection"
  }
  fn parameters() -> Vec<Parameter> {
    vec![Parameter::value("url").with_default(String::from("postgres://localhost/app"))]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(Connection {
      url: args.value("url")?,
    })
  }
}

struct Repository {
  connection: Arc<Connection>,
  url: String,
}

impl Autowire for Repository {
  fn id() -> &'static str {
    "repository"
  }
  fn parameters() -> Vec<Parameter> {
    vec![
      Parameter::of::<Connection>("connection"),
      Parameter::value("url").with_default(String::from("unset")),
    ]
  }
  fn construct(args: Arguments) -> Result<Self> {
    Ok(Repository {
      connection: args.get("connection")?,
      url: args.value("url")?,
    })
  }
}

fn main() -> Result<()> {
  types().register::<Repository>();
  let container = Container::new();

  // The override fills the repository's own `url` parameter only. The
  // connection it depends on is resolved normally and keeps its default.
  let params = Parameters::new().with("url", String::from("sqlite://override"));
  let repository = container.make_as_with::<Repository>("repository", &params)?;

  println!("repository.url            = {}", repository.url);
  println!("repository.connection.url = {}", repository.connection.url);
  assert_eq!(repository.url, "sqlite://override");
  assert_eq!(repository.connection.url, "postgres://localhost/app");
  Ok(())
}
