use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

/// Audience role a tool is recommended for (distinct from the free-text
/// role string on a user account, which references these by name).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RoleWithTools {
    pub id: Uuid,
    pub name: String,
    pub tools: Vec<crate::models::tool::ToolSummary>,
}
