//! GetProfile command

use crate::context::RequestContext;
use crate::error::WorkspaceError;
use crate::store::users;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};

/// The caller's own user record
#[operation(verb = "get", noun = "profile", description = "Get the caller's profile")]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GetProfile;

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for GetProfile {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user_id = ctx.require_user()?;
            let user = ctx
                .db()
                .read(|conn| users::get(conn, user_id))?
                .ok_or_else(|| WorkspaceError::not_found("user", user_id))?;
            Ok(serde_json::to_value(&user)?)
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;

    #[tokio::test]
    async fn test_get_profile() {
        let bed = setup().await;
        let result = GetProfile
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["id"], "alice");
        assert_eq!(result["email"], "alice@example.com");
    }
}
