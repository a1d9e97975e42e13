use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::role::{Role, RoleRequest};
use crate::models::tool::ToolSummary;
use uuid::Uuid;

impl PostgresRepository {
    pub async fn create_role(&self, request: &RoleRequest) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(&request.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    pub async fn get_role_by_id(&self, id: &Uuid) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    /// Registration validates its optional role name against this catalogue.
    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    pub async fn update_role(&self, id: &Uuid, request: &RoleRequest) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at
            "#,
        )
        .bind(&request.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Role not found".to_string()))?;

        Ok(role)
    }

    pub async fn delete_role(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM roles WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(())
    }

    pub async fn tools_for_role(&self, role_id: &Uuid) -> Result<Vec<ToolSummary>, AppError> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            id: Uuid,
            name: String,
            status: String,
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT t.id, t.name, t.status
            FROM tools t
            JOIN role_tool rt ON rt.tool_id = t.id
            WHERE rt.role_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ToolSummary {
                id: row.id,
                name: row.name,
                status: crate::database::tool::status_from_db(&row.status),
            })
            .collect())
    }
}
