//! Error types for the workflow engine

use thiserror::Error;

/// Boxed error returned by actions and transforms
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while running a state machine
///
/// There is no recovery inside the engine: the first failing step ends the
/// run and the error carries the name of that step. Failures inside a
/// bounded iteration are wrapped once per nesting level.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// An action step's external operation failed
    #[error("Step '{step}' failed: {source}")]
    ActionFailed {
        step: String,
        #[source]
        source: BoxError,
    },

    /// A transform step could not derive its output
    #[error("Step '{step}' could not transform the context: {source}")]
    TransformFailed {
        step: String,
        #[source]
        source: BoxError,
    },

    /// One of the sub-runs of a bounded iteration failed
    #[error("Step '{step}' failed on item {index}: {source}")]
    IterationFailed {
        step: String,
        index: usize,
        #[source]
        source: Box<WorkflowError>,
    },

    /// A sub-run of a bounded iteration panicked or was cancelled
    #[error("Step '{step}' item {index} did not complete: {message}")]
    IterationAborted {
        step: String,
        index: usize,
        message: String,
    },

    /// A transition named a step the machine does not define
    #[error("Unknown step '{0}'")]
    UnknownStep(String),
}

impl WorkflowError {
    /// Name of the step that failed, at the innermost nesting level
    pub fn step(&self) -> Option<&str> {
        match self.innermost() {
            WorkflowError::ActionFailed { step, .. }
            | WorkflowError::TransformFailed { step, .. }
            | WorkflowError::IterationFailed { step, .. }
            | WorkflowError::IterationAborted { step, .. } => Some(step.as_str()),
            WorkflowError::UnknownStep(_) => None,
        }
    }

    /// Follows nested iteration failures down to the root error
    pub fn innermost(&self) -> &WorkflowError {
        match self {
            WorkflowError::IterationFailed { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// Returns the typed root cause of an action or transform failure
    pub fn find_cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self.innermost() {
            WorkflowError::ActionFailed { source, .. }
            | WorkflowError::TransformFailed { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// True when the root cause is a failed external operation
    pub fn is_action_failure(&self) -> bool {
        matches!(self.innermost(), WorkflowError::ActionFailed { .. })
    }
}

/// Errors found while validating a state machine definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("State machine '{0}' has no start step")]
    MissingStart(String),

    #[error("Start step '{0}' is not defined")]
    UnknownStart(String),

    #[error("Step '{0}' is defined more than once")]
    DuplicateStep(String),

    #[error("Step '{from}' transitions to undefined step '{to}'")]
    UnknownTarget { from: String, to: String },

    #[error("Step '{0}' must allow at least one concurrent iteration")]
    ZeroConcurrency(String),
}
