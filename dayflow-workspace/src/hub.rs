//! GetHub command

use crate::context::RequestContext;
use crate::error::WorkspaceError;
use crate::store::{cards, tools};
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};

/// The caller's personal cards and tools, outside every workspace
#[operation(verb = "get", noun = "hub", description = "Get the caller's personal cards and tools")]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GetHub;

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for GetHub {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user = ctx.require_user()?;
            let (cards, tools) = ctx
                .db()
                .read(|conn| Ok((cards::list_hub(conn, user)?, tools::list_hub(conn, user)?)))?;
            Ok(serde_json::json!({
                "cards": cards,
                "tools": tools,
            }))
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{AddCard, MoveCard};
    use crate::test_support::setup;

    #[tokio::test]
    async fn test_hub_cards_reorder_without_lease() {
        let bed = setup().await;
        let processor = bed.processor();
        let mut ids = Vec::new();
        for title in ["a", "b"] {
            let card = processor.mutate(&AddCard::new(title), &bed.alice).await.unwrap();
            ids.push(card["id"].as_str().unwrap().to_string());
        }
        processor
            .mutate(&MoveCard::to_backlog(ids[1].as_str(), 0), &bed.alice)
            .await
            .unwrap();

        let hub = processor.query(&GetHub, &bed.alice).await.unwrap();
        assert_eq!(hub["cards"][0]["title"], "b");
        assert_eq!(hub["cards"][1]["title"], "a");

        let theirs = processor.query(&GetHub, &bed.bob).await.unwrap();
        assert_eq!(theirs["cards"], serde_json::json!([]));
    }
}
