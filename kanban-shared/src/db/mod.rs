/// PostgreSQL plumbing for the `postgres` store backend
///
/// # Modules
///
/// - `pool`: connection pool creation, health checks and shutdown
/// - `migrations`: embedded schema migrations for the `documents` table
///
/// # Example
///
/// ```no_run
/// use kanban_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
/// use kanban_shared::store::PgStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     let store = PgStore::new(pool);
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
