//! The operation metadata and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Metadata every command carries: what it does and to which noun.
///
/// Normally implemented by the `#[operation]` attribute.
pub trait Operation {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The target entity kind, e.g. "card"
    fn noun(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Canonical op string used for logging and exemption checks ("move card")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute a command against a context
#[async_trait]
pub trait Execute<C, E>: Send + Sync
where
    C: Send + Sync,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcquireStub;

    impl Operation for AcquireStub {
        fn verb(&self) -> &'static str {
            "acquire"
        }
        fn noun(&self) -> &'static str {
            "lock"
        }
        fn description(&self) -> &'static str {
            "Take the lock"
        }
    }

    #[async_trait]
    impl Execute<(), String> for AcquireStub {
        async fn execute(&self, _ctx: &()) -> ExecutionResult<Value, String> {
            ExecutionResult::Unlogged {
                value: Value::Bool(true),
            }
        }
    }

    #[test]
    fn test_op_string_joins_verb_and_noun() {
        assert_eq!(AcquireStub.op_string(), "acquire lock");
    }

    #[tokio::test]
    async fn test_execute_unlogged() {
        let result = AcquireStub.execute(&()).await;
        assert!(!result.should_log());
        assert_eq!(result.into_result().unwrap(), Value::Bool(true));
    }
}
