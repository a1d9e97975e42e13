use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::category::CategoryResponse;
use crate::models::pagination::PaginationParams;
use crate::models::role::RoleResponse;
use crate::models::tool::{Difficulty, Tool, ToolOwner, ToolRequest, ToolResponse, ToolStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

// Intermediate struct for sqlx query results with the enums as text
#[derive(Debug, sqlx::FromRow)]
struct ToolRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    documentation_url: Option<String>,
    video_url: Option<String>,
    difficulty: Option<String>,
    status: String,
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ToolRow> for Tool {
    fn from(row: ToolRow) -> Self {
        Tool {
            id: row.id,
            name: row.name,
            description: row.description,
            documentation_url: row.documentation_url,
            video_url: row.video_url,
            difficulty: row.difficulty.as_deref().map(difficulty_from_db),
            status: status_from_db(&row.status),
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TOOL_COLUMNS: &str = "id, name, description, documentation_url, video_url, difficulty, status, user_id, created_at, updated_at";

impl PostgresRepository {
    pub async fn create_tool(&self, request: &ToolRequest, user_id: Option<&Uuid>) -> Result<Tool, AppError> {
        let row = sqlx::query_as::<_, ToolRow>(&format!(
            r#"
            INSERT INTO tools (name, description, documentation_url, video_url, difficulty, status, user_id)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING {TOOL_COLUMNS}
            "#,
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.documentation_url)
        .bind(&request.video_url)
        .bind(request.difficulty.map(difficulty_to_db))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let tool = Tool::from(row);
        self.sync_tool_categories(&tool.id, &request.category_ids).await?;
        self.sync_tool_roles(&tool.id, &request.role_ids).await?;

        Ok(tool)
    }

    pub async fn get_tool_by_id(&self, id: &Uuid) -> Result<Option<Tool>, AppError> {
        let row = sqlx::query_as::<_, ToolRow>(&format!(
            r#"
            SELECT {TOOL_COLUMNS}
            FROM tools
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tool::from))
    }

    pub async fn list_tools(&self, pagination: &PaginationParams) -> Result<(Vec<Tool>, i64), AppError> {
        #[derive(sqlx::FromRow)]
        struct CountRow {
            total: i64,
        }

        let count_row = sqlx::query_as::<_, CountRow>("SELECT COUNT(*) as total FROM tools")
            .fetch_one(&self.pool)
            .await?;
        let total = count_row.total;

        let rows = sqlx::query_as::<_, ToolRow>(&format!(
            r#"
            SELECT {TOOL_COLUMNS}
            FROM tools
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(pagination.effective_limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Tool::from).collect(), total))
    }

    pub async fn update_tool(&self, id: &Uuid, request: &ToolRequest) -> Result<Tool, AppError> {
        let row = sqlx::query_as::<_, ToolRow>(&format!(
            r#"
            UPDATE tools
            SET name = $1, description = $2, documentation_url = $3, video_url = $4, difficulty = $5, updated_at = now()
            WHERE id = $6
            RETURNING {TOOL_COLUMNS}
            "#,
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.documentation_url)
        .bind(&request.video_url)
        .bind(request.difficulty.map(difficulty_to_db))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Tool not found".to_string()))?;

        let tool = Tool::from(row);
        self.sync_tool_categories(&tool.id, &request.category_ids).await?;
        self.sync_tool_roles(&tool.id, &request.role_ids).await?;

        Ok(tool)
    }

    /// Moderation: move a submission between pending/approved/rejected.
    pub async fn update_tool_status(&self, id: &Uuid, status: ToolStatus) -> Result<Tool, AppError> {
        let row = sqlx::query_as::<_, ToolRow>(&format!(
            r#"
            UPDATE tools
            SET status = $1, updated_at = now()
            WHERE id = $2
            RETURNING {TOOL_COLUMNS}
            "#,
        ))
        .bind(status_to_db(status))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Tool not found".to_string()))?;

        Ok(Tool::from(row))
    }

    pub async fn delete_tool(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tools WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(())
    }

    /// Replace the tool's category links with exactly the given set.
    pub async fn sync_tool_categories(&self, tool_id: &Uuid, category_ids: &[Uuid]) -> Result<(), AppError> {
        sqlx::query("DELETE FROM category_tool WHERE tool_id = $1")
            .bind(tool_id)
            .execute(&self.pool)
            .await?;

        for category_id in category_ids {
            sqlx::query(
                r#"
                INSERT INTO category_tool (category_id, tool_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(category_id)
            .bind(tool_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Replace the tool's role links with exactly the given set.
    pub async fn sync_tool_roles(&self, tool_id: &Uuid, role_ids: &[Uuid]) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_tool WHERE tool_id = $1").bind(tool_id).execute(&self.pool).await?;

        for role_id in role_ids {
            sqlx::query(
                r#"
                INSERT INTO role_tool (role_id, tool_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(role_id)
            .bind(tool_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Load categories, roles, and owners for a page of tools and assemble
    /// the response shapes. Three queries total, independent of page size.
    pub async fn load_tool_relations(&self, tools: Vec<Tool>) -> Result<Vec<ToolResponse>, AppError> {
        let tool_ids: Vec<Uuid> = tools.iter().map(|tool| tool.id).collect();

        #[derive(sqlx::FromRow)]
        struct LinkedCategoryRow {
            tool_id: Uuid,
            id: Uuid,
            name: String,
        }

        let category_rows = sqlx::query_as::<_, LinkedCategoryRow>(
            r#"
            SELECT ct.tool_id, c.id, c.name
            FROM category_tool ct
            JOIN categories c ON c.id = ct.category_id
            WHERE ct.tool_id = ANY($1)
            ORDER BY c.name
            "#,
        )
        .bind(&tool_ids)
        .fetch_all(&self.pool)
        .await?;

        #[derive(sqlx::FromRow)]
        struct LinkedRoleRow {
            tool_id: Uuid,
            id: Uuid,
            name: String,
        }

        let role_rows = sqlx::query_as::<_, LinkedRoleRow>(
            r#"
            SELECT rt.tool_id, r.id, r.name
            FROM role_tool rt
            JOIN roles r ON r.id = rt.role_id
            WHERE rt.tool_id = ANY($1)
            ORDER BY r.name
            "#,
        )
        .bind(&tool_ids)
        .fetch_all(&self.pool)
        .await?;

        let owner_ids: Vec<Uuid> = tools.iter().filter_map(|tool| tool.user_id).collect();
        let owner_rows = sqlx::query_as::<_, ToolOwner>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&owner_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut categories_by_tool: HashMap<Uuid, Vec<CategoryResponse>> = HashMap::new();
        for row in category_rows {
            categories_by_tool
                .entry(row.tool_id)
                .or_default()
                .push(CategoryResponse { id: row.id, name: row.name });
        }

        let mut roles_by_tool: HashMap<Uuid, Vec<RoleResponse>> = HashMap::new();
        for row in role_rows {
            roles_by_tool.entry(row.tool_id).or_default().push(RoleResponse { id: row.id, name: row.name });
        }

        let owners_by_id: HashMap<Uuid, ToolOwner> = owner_rows.into_iter().map(|owner| (owner.id, owner)).collect();

        Ok(tools
            .into_iter()
            .map(|tool| ToolResponse {
                categories: categories_by_tool.remove(&tool.id).unwrap_or_default(),
                roles: roles_by_tool.remove(&tool.id).unwrap_or_default(),
                user: tool.user_id.and_then(|user_id| owners_by_id.get(&user_id).cloned()),
                id: tool.id,
                name: tool.name,
                description: tool.description,
                documentation_url: tool.documentation_url,
                video_url: tool.video_url,
                difficulty: tool.difficulty,
                status: tool.status,
                created_at: tool.created_at,
                updated_at: tool.updated_at,
            })
            .collect())
    }

    /// Convenience for single-tool responses.
    pub async fn load_tool_response(&self, tool: Tool) -> Result<ToolResponse, AppError> {
        let mut responses = self.load_tool_relations(vec![tool]).await?;
        responses.pop().ok_or_else(|| AppError::NotFound("Tool not found".to_string()))
    }
}

pub(crate) fn status_from_db(value: &str) -> ToolStatus {
    match value {
        "pending" => ToolStatus::Pending,
        "approved" => ToolStatus::Approved,
        "rejected" => ToolStatus::Rejected,
        other => panic!("Unknown tool status: {}", other),
    }
}

pub(crate) fn status_to_db(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::Pending => "pending",
        ToolStatus::Approved => "approved",
        ToolStatus::Rejected => "rejected",
    }
}

pub(crate) fn difficulty_from_db(value: &str) -> Difficulty {
    match value {
        "beginner" => Difficulty::Beginner,
        "intermediate" => Difficulty::Intermediate,
        "advanced" => Difficulty::Advanced,
        other => panic!("Unknown difficulty: {}", other),
    }
}

pub(crate) fn difficulty_to_db(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "beginner",
        Difficulty::Intermediate => "intermediate",
        Difficulty::Advanced => "advanced",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_round_trips() {
        for status in [ToolStatus::Pending, ToolStatus::Approved, ToolStatus::Rejected] {
            assert_eq!(status_from_db(status_to_db(status)), status);
        }
    }

    #[test]
    fn difficulty_mapping_round_trips() {
        for difficulty in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced] {
            assert_eq!(difficulty_from_db(difficulty_to_db(difficulty)), difficulty);
        }
    }

    #[test]
    #[should_panic(expected = "Unknown tool status")]
    fn unknown_status_panics() {
        status_from_db("archived");
    }
}
