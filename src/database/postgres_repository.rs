use sqlx::PgPool;

/// Repository over the shared connection pool. Route handlers construct one
/// per request from the managed `PgPool`.
#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}
