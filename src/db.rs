use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Schema, Statement};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::employee::SENTINEL_CODE;
use crate::entity::{department, employee, sequence};

/// Assigned employee codes are unique; placeholder rows may repeat.
fn employee_code_index_sql() -> String {
    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_hr_employee_code ON hr_employee (employee_code) \
         WHERE btrim(employee_code) NOT IN ('', '{}')",
        SENTINEL_CODE
    )
}

/// Initialize database connection and auto-migrate tables
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let database_url = config.connection_url();

    info!("Connecting to database: {}:{}/{}", config.host, config.port, config.name);

    let mut opt = ConnectOptions::new(&database_url);
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug)
        .set_schema_search_path("public");

    let db = Database::connect(opt).await?;
    info!("Database connection established");

    auto_migrate(&db).await?;

    Ok(db)
}

/// Create missing tables
async fn auto_migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Running auto-migration for all entities...");

    create_table_if_not_exists(db, backend, schema.create_table_from_entity(department::Entity)).await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(employee::Entity)).await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(sequence::Entity)).await?;

    db.execute(Statement::from_string(backend, employee_code_index_sql()))
        .await?;

    info!("Auto-migration completed successfully");
    Ok(())
}

/// Create a table if it doesn't exist
async fn create_table_if_not_exists(
    db: &DatabaseConnection,
    backend: DbBackend,
    mut stmt: TableCreateStatement,
) -> Result<(), DbErr> {
    stmt.if_not_exists();

    let sql = backend.build(&stmt);

    db.execute(Statement::from_string(backend, sql.to_string())).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_table_statement() {
        let schema = Schema::new(DbBackend::Postgres);
        let mut stmt = schema.create_table_from_entity(employee::Entity);
        stmt.if_not_exists();
        let sql = DbBackend::Postgres.build(&stmt).to_string();
        assert!(sql.starts_with(r#"CREATE TABLE IF NOT EXISTS "hr_employee""#), "{}", sql);
        assert!(sql.contains(r#""employee_code" text"#), "{}", sql);
        assert!(sql.contains(r#""work_phone" text"#), "{}", sql);
        assert!(sql.contains(r#""personal_email" text"#), "{}", sql);
    }

    #[test]
    fn test_department_code_is_unique() {
        let schema = Schema::new(DbBackend::Postgres);
        let sql = DbBackend::Postgres
            .build(&schema.create_table_from_entity(department::Entity))
            .to_string();
        assert!(sql.contains(r#""code" text"#), "{}", sql);
        assert!(sql.contains("UNIQUE"), "{}", sql);
    }

    #[test]
    fn test_employee_code_index_skips_placeholder() {
        let sql = employee_code_index_sql();
        assert!(sql.starts_with("CREATE UNIQUE INDEX IF NOT EXISTS"), "{}", sql);
        assert!(sql.contains("NOT IN ('', 'New')"), "{}", sql);
    }

    #[test]
    fn test_sequence_table_keyed_by_code() {
        let schema = Schema::new(DbBackend::Postgres);
        let sql = DbBackend::Postgres
            .build(&schema.create_table_from_entity(sequence::Entity))
            .to_string();
        assert!(sql.contains(r#""hr_sequence""#), "{}", sql);
        assert!(sql.contains("PRIMARY KEY"), "{}", sql);
    }
}
