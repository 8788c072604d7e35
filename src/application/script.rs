//! Operation scripts: the ordered list of steps a session walks through.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};

/// A single tree operation.
///
/// Serialized with an `op` tag, e.g. `{ op = "query", l = 2, r = 5 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Return every node to the default tag
    Reset,
    Query {
        l: usize,
        r: usize,
    },
    Update {
        index: usize,
        value: i64,
    },
    UpdateRange {
        l: usize,
        r: usize,
        delta: i64,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Reset => write!(f, "Reset"),
            Operation::Query { l, r } => write!(f, "Query [{}, {}]", l, r),
            Operation::Update { index, value } => write!(f, "Update T[{}] = {}", index, value),
            Operation::UpdateRange { l, r, delta } => {
                write!(f, "Range update [{}, {}] += {}", l, r, delta)
            }
        }
    }
}

/// An operation with an optional display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub operation: Operation,
}

impl Step {
    pub fn new(operation: Operation) -> Self {
        Self {
            label: None,
            operation,
        }
    }

    pub fn labeled(label: impl Into<String>, operation: Operation) -> Self {
        Self {
            label: Some(label.into()),
            operation,
        }
    }

    /// The explicit label, or a description of the operation.
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.operation.to_string())
    }
}

/// Ordered, non-empty list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new(steps: Vec<Step>) -> ApplicationResult<Self> {
        if steps.is_empty() {
            return Err(ApplicationError::Script {
                message: "script has no steps".to_string(),
            });
        }
        Ok(Self { steps })
    }

    /// The seven-step walkthrough over `[2, 1, 3, 4, 5, 7, 8, 9]`.
    pub fn demo() -> Self {
        Self {
            steps: vec![
                Step::labeled("Initial state", Operation::Reset),
                Step::new(Operation::Query { l: 2, r: 5 }),
                Step::new(Operation::Update { index: 3, value: 10 }),
                Step::labeled("Query [2, 5] (post-update)", Operation::Query { l: 2, r: 5 }),
                Step::new(Operation::UpdateRange { l: 1, r: 4, delta: 3 }),
                Step::new(Operation::Query { l: 2, r: 5 }),
                Step::labeled("Final state", Operation::Reset),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        script: Vec<Step>,
    }

    #[test]
    fn given_toml_steps_when_parsing_then_tagged_operations() {
        let raw = r#"
[[script]]
label = "Start"
op = "reset"

[[script]]
op = "query"
l = 2
r = 5

[[script]]
op = "update_range"
l = 1
r = 4
delta = -3
"#;
        let parsed: Wrapper = toml::from_str(raw).unwrap();
        assert_eq!(parsed.script.len(), 3);
        assert_eq!(parsed.script[0].label(), "Start");
        assert_eq!(parsed.script[1].operation, Operation::Query { l: 2, r: 5 });
        assert_eq!(
            parsed.script[2].operation,
            Operation::UpdateRange { l: 1, r: 4, delta: -3 }
        );
    }

    #[test]
    fn given_no_steps_when_creating_script_then_errors() {
        assert!(matches!(
            Script::new(vec![]),
            Err(ApplicationError::Script { .. })
        ));
    }

    #[test]
    fn given_demo_script_then_seven_steps_with_labels() {
        let script = Script::demo();
        assert_eq!(script.len(), 7);
        assert_eq!(script.get(2).unwrap().label(), "Update T[3] = 10");
        assert_eq!(script.get(6).unwrap().label(), "Final state");
    }
}
