//! UpdateProfile command

use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::users;
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Change the caller's display name or avatar. Omitted fields stay as they are;
/// an empty avatar url clears it.
#[operation(
    verb = "update",
    noun = "profile",
    description = "Change the caller's display name or avatar"
)]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateProfile {
    /// New display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// New avatar URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UpdateProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

impl Mutation for UpdateProfile {
    fn target(&self) -> MutationTarget {
        MutationTarget::Global
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for UpdateProfile {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user_id = ctx.require_user()?;
            let user = ctx.write(|conn| {
                let mut user = users::get(conn, user_id)?
                    .ok_or_else(|| WorkspaceError::not_found("user", user_id))?;
                if let Some(name) = &self.display_name {
                    user.display_name =
                        validate::title("display_name", name, ctx.limits().max_title_length)?;
                }
                if let Some(url) = &self.avatar_url {
                    user.avatar_url = match validate::optional_text(Some(url.as_str())) {
                        Some(url) => Some(validate::link("avatar_url", &url)?),
                        None => None,
                    };
                }
                users::update_profile(
                    conn,
                    &user.id,
                    &user.display_name,
                    user.avatar_url.as_deref(),
                )?;
                Ok(user)
            })?;
            Ok(serde_json::to_value(&user)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
