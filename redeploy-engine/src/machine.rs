//! State machine definition and interpreter

use std::collections::HashMap;

use tracing::debug;

use crate::error::{DefinitionError, WorkflowError};
use crate::step::{Step, StepKind, Transition};

/// Final state of a successful run
#[derive(Debug, Clone)]
pub struct Completed<C> {
    /// Context as left by the last step
    pub context: C,

    /// Terminal step the run ended in
    pub terminal: &'static str,

    /// Step names in the order they were entered
    pub visited: Vec<&'static str>,
}

/// A validated step graph
pub struct StateMachine<C> {
    name: String,
    start_at: &'static str,
    steps: HashMap<&'static str, Step<C>>,
}

impl<C: Send> StateMachine<C> {
    /// Starts building a state machine with the given name
    pub fn builder(name: impl Into<String>) -> StateMachineBuilder<C> {
        StateMachineBuilder {
            name: name.into(),
            start_at: None,
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_at(&self) -> &'static str {
        self.start_at
    }

    /// Runs the machine to a terminal step
    ///
    /// The context is moved through every step. Any failing step ends the
    /// run; there are no retries or catch handlers.
    pub async fn run(&self, mut context: C) -> Result<Completed<C>, WorkflowError> {
        let mut current = self.start_at;
        let mut visited = Vec::new();

        loop {
            let step = self
                .steps
                .get(current)
                .ok_or_else(|| WorkflowError::UnknownStep(current.to_string()))?;

            debug!(machine = %self.name, step = current, "Entering step");
            visited.push(current);

            let transition = match &step.kind {
                StepKind::Action { action, next } => {
                    context = action.invoke(context).await.map_err(|source| {
                        WorkflowError::ActionFailed {
                            step: current.to_string(),
                            source,
                        }
                    })?;
                    *next
                }
                StepKind::Transform { transform, next } => {
                    context = transform(context).map_err(|source| {
                        WorkflowError::TransformFailed {
                            step: current.to_string(),
                            source,
                        }
                    })?;
                    *next
                }
                StepKind::Choice { rules, default } => {
                    let target = rules
                        .iter()
                        .find(|rule| rule.predicate.evaluate(&context))
                        .map(|rule| rule.next)
                        .unwrap_or(*default);
                    debug!(machine = %self.name, step = current, next = target, "Choice made");
                    Transition::Next(target)
                }
                StepKind::Map { map, next } => {
                    context = map.iterate(current, context).await?;
                    *next
                }
                StepKind::Succeed => Transition::End,
            };

            match transition {
                Transition::Next(next) => current = next,
                Transition::End => {
                    debug!(machine = %self.name, step = current, "Run completed");
                    return Ok(Completed {
                        context,
                        terminal: current,
                        visited,
                    });
                }
            }
        }
    }
}

/// Collects steps and validates the graph on [`build`](Self::build)
pub struct StateMachineBuilder<C> {
    name: String,
    start_at: Option<&'static str>,
    steps: Vec<Step<C>>,
}

impl<C: Send> StateMachineBuilder<C> {
    pub fn start_at(mut self, step: &'static str) -> Self {
        self.start_at = Some(step);
        self
    }

    pub fn step(mut self, step: Step<C>) -> Self {
        self.steps.push(step);
        self
    }

    /// Validates the definition
    ///
    /// # Errors
    /// - No start step, or a start step that is not defined
    /// - Two steps with the same name
    /// - A transition to an undefined step
    /// - A bounded iteration allowing zero concurrent runs
    pub fn build(self) -> Result<StateMachine<C>, DefinitionError> {
        let start_at = self
            .start_at
            .ok_or_else(|| DefinitionError::MissingStart(self.name.clone()))?;

        let mut steps = HashMap::with_capacity(self.steps.len());
        for step in self.steps {
            if let StepKind::Map { map, .. } = &step.kind {
                if map.max_concurrency() == 0 {
                    return Err(DefinitionError::ZeroConcurrency(step.name.to_string()));
                }
            }

            if steps.contains_key(step.name) {
                return Err(DefinitionError::DuplicateStep(step.name.to_string()));
            }
            steps.insert(step.name, step);
        }

        if !steps.contains_key(start_at) {
            return Err(DefinitionError::UnknownStart(start_at.to_string()));
        }

        for step in steps.values() {
            for target in step.targets() {
                if !steps.contains_key(target) {
                    return Err(DefinitionError::UnknownTarget {
                        from: step.name.to_string(),
                        to: target.to_string(),
                    });
                }
            }
        }

        Ok(StateMachine {
            name: self.name,
            start_at,
            steps,
        })
    }
}
