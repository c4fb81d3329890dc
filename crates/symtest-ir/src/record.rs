use crate::value::{ConcreteValue, SymbolicValue};

/// How one explored execution ended, as recorded by the driver script.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The call returned this value.
    Returned(SymbolicValue),
    /// The call threw; carries the error message.
    Threw(String),
}

/// One explored execution of the driver script.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    /// One entry per declared symbolic argument, in positional order.
    pub input: Vec<SymbolicValue>,
    pub outcome: Outcome,
}

/// Expected behaviour of a generated assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    Returns(ConcreteValue),
    Throws(String),
}

/// An execution record with every symbolic wrapper reduced to its concrete value.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub input: Vec<ConcreteValue>,
    pub outcome: TestOutcome,
}

impl TestCase {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, TestOutcome::Throws(_))
    }
}

impl From<ExecutionRecord> for TestCase {
    fn from(record: ExecutionRecord) -> Self {
        let input = record
            .input
            .into_iter()
            .map(SymbolicValue::into_concrete)
            .collect();
        let outcome = match record.outcome {
            Outcome::Returned(value) => TestOutcome::Returns(value.into_concrete()),
            Outcome::Threw(message) => TestOutcome::Throws(message),
        };
        Self { input, outcome }
    }
}
