//! RegisterUser command

use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::users;
use crate::types::{User, UserId};
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Create a user record. Emails are unique, compared case-insensitively.
#[operation(
    verb = "register",
    noun = "user",
    description = "Create a user account"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterUser {
    /// Login email, unique across users
    pub email: String,
    /// Name shown to collaborators
    pub display_name: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl RegisterUser {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

fn normalize_email(email: &str) -> Result<String, WorkspaceError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(WorkspaceError::invalid_value("email", "not an email address")),
    }
}

impl Mutation for RegisterUser {
    fn target(&self) -> MutationTarget {
        MutationTarget::Global
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for RegisterUser {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let email = normalize_email(&self.email)?;
            let display_name = validate::title(
                "display_name",
                &self.display_name,
                ctx.limits().max_title_length,
            )?;
            let avatar_url = match validate::optional_text(self.avatar_url.as_deref()) {
                Some(url) => Some(validate::link("avatar_url", &url)?),
                None => None,
            };

            let user = User {
                id: UserId::new(),
                email,
                display_name,
                avatar_url,
                created_at: ctx.now(),
            };
            ctx.write(|conn| {
                if users::find_by_email(conn, &user.email)?.is_some() {
                    return Err(WorkspaceError::AlreadyExists {
                        resource: "user",
                        value: user.email.clone(),
                    });
                }
                users::insert(conn, &user)
            })?;
            info!(user_id = %user.id, "registered user");
            Ok(serde_json::to_value(&user)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
