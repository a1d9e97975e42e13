use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

/// `GET /categories/<id>` embeds the tools carrying the category.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CategoryWithTools {
    pub id: Uuid,
    pub name: String,
    pub tools: Vec<crate::models::tool::ToolSummary>,
}
