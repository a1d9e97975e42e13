use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::category::{Category, CategoryRequest};
use crate::models::tool::ToolSummary;
use uuid::Uuid;

impl PostgresRepository {
    pub async fn create_category(&self, request: &CategoryRequest) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(&request.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn get_category_by_id(&self, id: &Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn update_category(&self, id: &Uuid, request: &CategoryRequest) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at
            "#,
        )
        .bind(&request.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        Ok(category)
    }

    pub async fn delete_category(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM categories WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(())
    }

    /// Tools linked to the category, for the category detail view.
    pub async fn tools_for_category(&self, category_id: &Uuid) -> Result<Vec<ToolSummary>, AppError> {
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
            JOIN category_tool ct ON ct.tool_id = t.id
            WHERE ct.category_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(category_id)
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
