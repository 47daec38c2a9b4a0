//! Execution result types for operations

use crate::{LogEntry, Operation};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::time::Instant;

/// Result of executing an operation
///
/// Distinguishes between:
/// - Logged: Operations that mutate state and should be audited
/// - Unlogged: Read-only operations with no side effects
/// - Failed: Errors (optionally logged)
pub enum ExecutionResult<T, E> {
    /// Operation succeeded and should be logged
    Logged { value: T, log_entry: LogEntry },
    /// Operation succeeded but no logging needed (read-only)
    Unlogged { value: T },
    /// Operation failed
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<E: Display> ExecutionResult<Value, E> {
    /// Wrap the outcome of a mutating operation, attaching a log entry either way.
    pub fn logged<O>(operation: &O, outcome: Result<Value, E>, started: Instant) -> Self
    where
        O: Operation + Serialize + ?Sized,
    {
        let input = serde_json::to_value(operation).unwrap_or(Value::Null);
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(value) => Self::Logged {
                log_entry: LogEntry::new(
                    operation.op_string(),
                    input,
                    value.clone(),
                    None,
                    duration_ms,
                ),
                value,
            },
            Err(error) => {
                let output = serde_json::json!({ "error": error.to_string() });
                Self::Failed {
                    log_entry: Some(LogEntry::new(
                        operation.op_string(),
                        input,
                        output,
                        None,
                        duration_ms,
                    )),
                    error,
                }
            }
        }
    }

    /// Wrap the outcome of a read-only operation
    pub fn unlogged(outcome: Result<Value, E>) -> Self {
        match outcome {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } => Ok(value),
            Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Check if this should be logged
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Rename {
        title: String,
    }

    impl Operation for Rename {
        fn verb(&self) -> &'static str {
            "update"
        }
        fn noun(&self) -> &'static str {
            "column"
        }
        fn description(&self) -> &'static str {
            "rename"
        }
    }

    #[test]
    fn test_logged_success_carries_input_and_output() {
        let op = Rename {
            title: "Doing".into(),
        };
        let result: ExecutionResult<Value, String> =
            ExecutionResult::logged(&op, Ok(serde_json::json!({"ok": true})), Instant::now());

        let (value, entry) = result.split();
        let entry = entry.unwrap();
        assert_eq!(value.unwrap()["ok"], true);
        assert_eq!(entry.op, "update column");
        assert_eq!(entry.input["title"], "Doing");
    }

    #[test]
    fn test_logged_failure_records_error_message() {
        let op = Rename {
            title: String::new(),
        };
        let result: ExecutionResult<Value, String> =
            ExecutionResult::logged(&op, Err("title is empty".to_string()), Instant::now());

        assert!(result.should_log());
        let (value, entry) = result.split();
        assert_eq!(value.unwrap_err(), "title is empty");
        assert_eq!(entry.unwrap().output["error"], "title is empty");
    }

    #[test]
    fn test_unlogged_failure_has_no_entry() {
        let result: ExecutionResult<Value, String> = ExecutionResult::unlogged(Err("nope".into()));
        assert!(!result.should_log());
    }
}
