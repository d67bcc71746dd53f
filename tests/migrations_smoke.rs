use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;

#[tokio::test]
async fn migrations_apply_and_tables_exist() -> anyhow::Result<()> {
    let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);
    // A shared in-memory database lives and dies with its connection.
    let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;

    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new("migrations")).await?;
    migrator.run(&pool).await?;

    let tables = ["admins", "students", "subjects", "questions", "exams", "results"];

    for table in tables {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(&pool)
            .await?;
        let name: Option<String> = row.map(|r| r.try_get(0)).transpose()?;
        assert!(name.is_some(), "expected table {table} to exist after migrations");
    }

    Ok(())
}
