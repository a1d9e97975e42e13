use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::role::{RoleRequest, RoleResponse, RoleWithTools};
use rocket::http::Status;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[openapi(tag = "Roles")]
#[get("/")]
pub async fn list_roles(pool: &State<PgPool>) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let roles = repo.list_roles().await?;

    Ok(Json(roles.iter().map(RoleResponse::from).collect()))
}

#[openapi(tag = "Roles")]
#[get("/<id>")]
pub async fn get_role(pool: &State<PgPool>, id: &str) -> Result<Json<RoleWithTools>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let uuid = Uuid::parse_str(id)?;
    let role = repo.get_role_by_id(&uuid).await?.ok_or_else(|| AppError::NotFound("Role not found".to_string()))?;
    let tools = repo.tools_for_role(&role.id).await?;

    Ok(Json(RoleWithTools {
        id: role.id,
        name: role.name,
        tools,
    }))
}

#[openapi(tag = "Roles")]
#[post("/", data = "<payload>")]
pub async fn create_role(pool: &State<PgPool>, payload: Json<RoleRequest>) -> Result<Created<Json<RoleResponse>>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let role = repo.create_role(&payload).await?;
    let location = format!("/roles/{}", role.id);

    Ok(Created::new(location).body(Json(RoleResponse::from(&role))))
}

#[openapi(tag = "Roles")]
#[put("/<id>", data = "<payload>")]
pub async fn update_role(pool: &State<PgPool>, id: &str, payload: Json<RoleRequest>) -> Result<Json<RoleResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    let role = repo.update_role(&uuid, &payload).await?;

    Ok(Json(RoleResponse::from(&role)))
}

#[openapi(tag = "Roles")]
#[delete("/<id>")]
pub async fn delete_role(pool: &State<PgPool>, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    repo.delete_role(&uuid).await?;

    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_roles, get_role, create_role, update_role, delete_role]
}
