//! Redeploy Workflow Engine
//!
//! A small interpreter for declarative step graphs over a single typed
//! context value. A [`StateMachine`] is built once from [`Step`]s, validated,
//! and can then be run any number of times; each run owns its context and
//! hands it from step to step.
//!
//! Supported step kinds:
//! - Action: awaits an external operation and records its result in the context
//! - Transform: pure derivation of context fields
//! - Choice: picks the next step from ordered predicates, with a mandatory default
//! - Map: runs a sub-machine per item with bounded concurrency
//! - Succeed: terminal
//!
//! # Example
//!
//! ```no_run
//! use redeploy_engine::{ChoiceRule, Predicate, StateMachine, Step, Transition};
//!
//! #[derive(Debug, Default)]
//! struct Greeting {
//!     name: Option<String>,
//!     text: Option<String>,
//! }
//!
//! # async fn example() -> anyhow::Result<()> {
//! let machine = StateMachine::builder("greeter")
//!     .start_at("HasName")
//!     .step(Step::choice(
//!         "HasName",
//!         vec![ChoiceRule::new(
//!             Predicate::IsPresent(|g: &Greeting| g.name.is_some()),
//!             "Greet",
//!         )],
//!         "Done",
//!     ))
//!     .step(Step::transform(
//!         "Greet",
//!         |mut g: Greeting| {
//!             g.text = g.name.as_ref().map(|n| format!("hello {}", n));
//!             Ok(g)
//!         },
//!         Transition::Next("Done"),
//!     ))
//!     .step(Step::succeed("Done"))
//!     .build()?;
//!
//! let completed = machine
//!     .run(Greeting { name: Some("fleet".to_string()), text: None })
//!     .await?;
//! assert_eq!(completed.visited, vec!["HasName", "Greet", "Done"]);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod machine;
mod map;
mod step;

pub use error::{BoxError, DefinitionError, WorkflowError};
pub use machine::{Completed, StateMachine, StateMachineBuilder};
pub use map::{Iterate, MapStep};
pub use step::{Action, ChoiceRule, Predicate, Step, StepKind, Transition};
