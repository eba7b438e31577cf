//! Step definitions
//!
//! Steps are plain data: a name, a kind, and where to go next. Behaviour that
//! needs to reach outside the engine is supplied through the [`Action`] trait.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::map::Iterate;

/// External operation invoked by an action step
///
/// The implementation owns both the call and the result path: it receives the
/// context, performs the operation, and returns the context with the
/// (optionally projected) result written into the appropriate field.
#[async_trait]
pub trait Action<C>: Send + Sync {
    async fn invoke(&self, context: C) -> Result<C, BoxError>;
}

/// Pure context derivation used by transform steps
pub type TransformFn<C> = Box<dyn Fn(C) -> Result<C, BoxError> + Send + Sync>;

/// Where to go after a step completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next(&'static str),
    End,
}

/// Condition evaluated by a choice step
pub enum Predicate<C> {
    /// The field is present and non-empty
    IsPresent(fn(&C) -> bool),

    /// Both fields are present and equal
    StringEquals(fn(&C) -> Option<&str>, fn(&C) -> Option<&str>),

    /// The field is present and equal to a literal
    StringEqualsValue(fn(&C) -> Option<&str>, &'static str),

    Not(Box<Predicate<C>>),
}

impl<C> Predicate<C> {
    pub fn evaluate(&self, context: &C) -> bool {
        match self {
            Predicate::IsPresent(field) => field(context),
            Predicate::StringEquals(left, right) => match (left(context), right(context)) {
                (Some(left), Some(right)) => left == right,
                _ => false,
            },
            Predicate::StringEqualsValue(field, value) => field(context) == Some(*value),
            Predicate::Not(inner) => !inner.evaluate(context),
        }
    }
}

/// A predicate and the step it selects
pub struct ChoiceRule<C> {
    pub predicate: Predicate<C>,
    pub next: &'static str,
}

impl<C> ChoiceRule<C> {
    pub fn new(predicate: Predicate<C>, next: &'static str) -> Self {
        Self { predicate, next }
    }
}

/// Behaviour of a step
pub enum StepKind<C> {
    Action {
        action: Box<dyn Action<C>>,
        next: Transition,
    },
    Transform {
        transform: TransformFn<C>,
        next: Transition,
    },
    Choice {
        rules: Vec<ChoiceRule<C>>,
        default: &'static str,
    },
    Map {
        map: Box<dyn Iterate<C>>,
        next: Transition,
    },
    Succeed,
}

/// A named node of the step graph
pub struct Step<C> {
    pub name: &'static str,
    pub kind: StepKind<C>,
}

impl<C> Step<C> {
    pub fn action(name: &'static str, action: impl Action<C> + 'static, next: Transition) -> Self {
        Self {
            name,
            kind: StepKind::Action {
                action: Box::new(action),
                next,
            },
        }
    }

    pub fn transform(
        name: &'static str,
        transform: impl Fn(C) -> Result<C, BoxError> + Send + Sync + 'static,
        next: Transition,
    ) -> Self {
        Self {
            name,
            kind: StepKind::Transform {
                transform: Box::new(transform),
                next,
            },
        }
    }

    pub fn choice(name: &'static str, rules: Vec<ChoiceRule<C>>, default: &'static str) -> Self {
        Self {
            name,
            kind: StepKind::Choice { rules, default },
        }
    }

    pub fn map(name: &'static str, map: impl Iterate<C> + 'static, next: Transition) -> Self {
        Self {
            name,
            kind: StepKind::Map {
                map: Box::new(map),
                next,
            },
        }
    }

    pub fn succeed(name: &'static str) -> Self {
        Self {
            name,
            kind: StepKind::Succeed,
        }
    }

    /// Every step name this step may transition to
    pub(crate) fn targets(&self) -> Vec<&'static str> {
        let next = match &self.kind {
            StepKind::Action { next, .. }
            | StepKind::Transform { next, .. }
            | StepKind::Map { next, .. } => *next,
            StepKind::Choice { rules, default } => {
                let mut targets: Vec<_> = rules.iter().map(|r| r.next).collect();
                targets.push(*default);
                return targets;
            }
            StepKind::Succeed => Transition::End,
        };

        match next {
            Transition::Next(target) => vec![target],
            Transition::End => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        left: Option<String>,
        right: Option<String>,
        items: Vec<String>,
    }

    fn doc(left: Option<&str>, right: Option<&str>) -> Doc {
        Doc {
            left: left.map(String::from),
            right: right.map(String::from),
            items: vec![],
        }
    }

    #[test]
    fn test_string_equals_requires_both_fields() {
        let predicate: Predicate<Doc> =
            Predicate::StringEquals(|d: &Doc| d.left.as_deref(), |d: &Doc| d.right.as_deref());

        assert!(predicate.evaluate(&doc(Some("a"), Some("a"))));
        assert!(!predicate.evaluate(&doc(Some("a"), Some("A"))));
        assert!(!predicate.evaluate(&doc(None, None)));
        assert!(!predicate.evaluate(&doc(Some("a"), None)));
    }

    #[test]
    fn test_is_present_and_not() {
        let present: Predicate<Doc> = Predicate::IsPresent(|d: &Doc| d.items.first().is_some());
        let absent = Predicate::Not(Box::new(Predicate::IsPresent(|d: &Doc| {
            d.items.first().is_some()
        })));

        let mut value = doc(None, None);
        assert!(!present.evaluate(&value));
        assert!(absent.evaluate(&value));

        value.items.push("x".to_string());
        assert!(present.evaluate(&value));
        assert!(!absent.evaluate(&value));
    }

    #[test]
    fn test_string_equals_value() {
        let predicate: Predicate<Doc> =
            Predicate::StringEqualsValue(|d: &Doc| d.left.as_deref(), "PUSH");

        assert!(predicate.evaluate(&doc(Some("PUSH"), None)));
        assert!(!predicate.evaluate(&doc(Some("push"), None)));
    }

    #[test]
    fn test_choice_targets_include_default() {
        let step: Step<Doc> = Step::choice(
            "Check",
            vec![ChoiceRule::new(
                Predicate::IsPresent(|d: &Doc| d.left.is_some()),
                "Yes",
            )],
            "No",
        );

        assert_eq!(step.targets(), vec!["Yes", "No"]);
        assert!(Step::<Doc>::succeed("Done").targets().is_empty());
    }
}
