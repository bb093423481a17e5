use crate::config::DatabaseConfig;
use crate::error::AppResult;
use deadpool_sqlite::{Config, Pool, PoolConfig, Runtime};
use rusqlite::Connection;

/// Apply database-wide PRAGMAs once at startup.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA page_size = 8192;
        PRAGMA temp_store = MEMORY;
        PRAGMA wal_autocheckpoint = 1000;
        ",
    )?;
    apply_connection_pragmas(conn)
}

/// PRAGMAs that SQLite scopes to a single connection. Pooled connections
/// are created lazily, so these run before every unit of work.
pub fn apply_connection_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )
}

/// Create a deadpool-sqlite connection pool.
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, deadpool_sqlite::CreatePoolError> {
    let db_path = config.path.clone();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(
                    error = %e,
                    dir = %parent.display(),
                    "failed to create database directory"
                );
            }
        }
    }

    // Set restrictive file permissions on the database file (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if db_path.exists() {
            if let Err(e) =
                std::fs::set_permissions(&db_path, std::fs::Permissions::from_mode(0o600))
            {
                tracing::warn!(error = %e, "failed to set database file permissions");
            }
        }
    }

    let mut cfg = Config::new(db_path);
    cfg.pool = Some(PoolConfig::new(config.pool_size));
    cfg.create_pool(Runtime::Tokio1)
}

/// Initialize the pool: get a connection and apply pragmas + run migrations.
pub async fn init_pool(pool: &Pool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get().await?;
    conn.interact(|conn| {
        apply_pragmas(conn)?;
        crate::storage::migrations::run_migrations(conn)?;
        Ok::<_, rusqlite::Error>(())
    })
    .await??;
    Ok(())
}

/// Run `f` on a pooled connection with per-connection PRAGMAs applied.
pub async fn with_conn<F, R>(pool: &Pool, f: F) -> AppResult<R>
where
    F: FnOnce(&mut Connection) -> rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
{
    let conn = pool.get().await?;
    let result = conn
        .interact(move |conn| {
            apply_connection_pragmas(conn)?;
            f(conn)
        })
        .await??;
    Ok(result)
}

/// Cheap liveness probe used by the health endpoint.
pub async fn ping(pool: &Pool) -> bool {
    with_conn(pool, |conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
        .await
        .is_ok()
}
