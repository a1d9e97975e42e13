use crate::models::category::CategoryResponse;
use crate::models::role::RoleResponse;
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Moderation state of a submission. New tools start as `Pending` until an
/// owner approves or rejects them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pending,
    Approved,
    Rejected,
}

/// Tool scalar columns as stored.
#[derive(Debug, Clone)]
pub struct Tool {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub documentation_url: Option<String>,
    pub video_url: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: ToolStatus,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ToolRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(url)]
    pub documentation_url: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToolStatusRequest {
    pub status: ToolStatus,
}

/// Submitter as embedded in tool responses.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct ToolOwner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Tool with its relations loaded, as returned by every tool endpoint.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ToolResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub documentation_url: Option<String>,
    pub video_url: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: ToolStatus,
    pub categories: Vec<CategoryResponse>,
    pub roles: Vec<RoleResponse>,
    pub user: Option<ToolOwner>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact tool shape embedded in category/role detail responses.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ToolSummary {
    pub id: Uuid,
    pub name: String,
    pub status: ToolStatus,
}

impl From<&Tool> for ToolSummary {
    fn from(tool: &Tool) -> Self {
        Self {
            id: tool.id,
            name: tool.name.clone(),
            status: tool.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ToolStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&ToolStatus::Approved).unwrap(), "\"approved\"");
        assert_eq!(serde_json::to_string(&ToolStatus::Rejected).unwrap(), "\"rejected\"");
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        assert!(serde_json::from_str::<ToolStatusRequest>(r#"{"status":"archived"}"#).is_err());
    }

    #[test]
    fn tool_request_rejects_bad_urls() {
        let request: ToolRequest = serde_json::from_str(
            r#"{"name":"Prompt Lab","documentation_url":"not a url"}"#,
        )
        .expect("parse");
        assert!(request.validate().is_err());
    }

    #[test]
    fn tool_request_defaults_relations_to_empty() {
        let request: ToolRequest = serde_json::from_str(r#"{"name":"Prompt Lab"}"#).expect("parse");
        assert!(request.category_ids.is_empty());
        assert!(request.role_ids.is_empty());
        assert!(request.validate().is_ok());
    }
}
