//! Activity records produced by logged operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One executed mutation, as stored in a workspace's activity feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID; sorts by creation time
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// `"{verb} {noun}"`, e.g. `"move card"`
    pub op: String,

    /// The command as it was submitted
    pub input: Value,

    /// Result value, or `{"error": ..}` when the command failed
    pub output: Value,

    /// User id of the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Workspace id the command touched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            scope: None,
            duration_ms,
        }
    }

    pub fn with_actor(self, actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
            ..self
        }
    }

    pub fn with_scope(self, scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_actor_and_scope_are_omitted() {
        let entry = LogEntry::new(
            "move card",
            json!({"position": 1}),
            json!({"order": 1}),
            None,
            3,
        );
        let encoded = serde_json::to_value(&entry).unwrap();

        assert!(encoded.get("actor").is_none());
        assert!(encoded.get("scope").is_none());
        assert_eq!(encoded["op"], "move card");
    }

    #[test]
    fn test_actor_and_scope_survive_a_round_trip() {
        let output = json!({"error": "not found"});
        let entry = LogEntry::new("delete column", json!({}), output, None, 0)
            .with_actor("alice")
            .with_scope("ws-1");

        let encoded = serde_json::to_string(&entry).unwrap();
        let decoded: LogEntry = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.actor.as_deref(), Some("alice"));
        assert_eq!(decoded.scope.as_deref(), Some("ws-1"));
        assert_eq!(decoded.output["error"], "not found");
    }
}
