use hackide_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub async fn init_pool_and_migrate(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.sqlx_logging(false);
    if database_url.contains(":memory:") {
        // 内存 SQLite 的每个连接都是一个独立的库。
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}
