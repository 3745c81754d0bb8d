use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema, Statement,
    sea_query::Index,
};

use crate::{entities::movies, error::AppResult};

pub async fn connect(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.acquire_timeout(Duration::from_secs(10)).sqlx_logging(false);

    // Every pooled connection to `:memory:` would open its own empty database.
    let in_memory = is_in_memory(database_url);
    if in_memory {
        opts.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opts).await?;

    if !in_memory {
        pragma(&db, "PRAGMA journal_mode=WAL").await?;
        pragma(&db, "PRAGMA synchronous=NORMAL").await?;
    }

    Ok(db)
}

/// Creates the `movies` table and its `(name, date)` unique index if absent.
pub async fn init_schema(db: &DatabaseConnection) -> AppResult<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let table = schema.create_table_from_entity(movies::Entity).if_not_exists().to_owned();
    db.execute(backend.build(&table)).await?;

    let unique = Index::create()
        .name("unique_movie_constraint")
        .table(movies::Entity)
        .col(movies::Column::Name)
        .col(movies::Column::Date)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&unique)).await?;

    Ok(())
}

pub async fn connect_and_init(database_url: &str) -> AppResult<DatabaseConnection> {
    let db = connect(database_url).await?;
    init_schema(&db).await?;
    Ok(db)
}

async fn pragma(db: &DatabaseConnection, sql: &str) -> AppResult<()> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_string())).await?;
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
