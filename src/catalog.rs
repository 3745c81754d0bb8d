use sea_orm::{
    DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::movies,
    error::AppResult,
    models::{PageRequest, PageResult},
};

/// Read-only access to the `movies` table.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens the per-request session. Dropping the returned transaction rolls
    /// it back and hands the connection back to the pool, so every exit path
    /// releases it.
    async fn session(&self) -> AppResult<DatabaseTransaction> {
        Ok(self.db.begin().await?)
    }

    /// Counts the catalog and fetches one page of it by ascending id, both
    /// inside the same session so the slice agrees with the count.
    pub async fn list_page(&self, req: PageRequest) -> AppResult<Option<PageResult>> {
        let session = self.session().await?;

        let total_items = movies::Entity::find().count(&session).await?;
        let total_pages = req.total_pages(total_items);

        // Past the last page the slice is empty anyway; skip the query rather
        // than hand SQLite an offset it cannot represent.
        let rows = if req.page > total_pages {
            Vec::new()
        } else {
            movies::Entity::find()
                .order_by_asc(movies::Column::Id)
                .offset(req.offset())
                .limit(req.per_page)
                .all(&session)
                .await?
        };

        debug!(
            page = req.page,
            per_page = req.per_page,
            total_items,
            rows = rows.len(),
            "fetched catalog page"
        );

        session.commit().await?;

        Ok(PageResult::assemble(req, rows, total_items))
    }

    pub async fn get(&self, movie_id: i64) -> AppResult<Option<movies::Model>> {
        // Ids are 32-bit in storage; anything wider cannot match a row.
        let Ok(id) = i32::try_from(movie_id) else {
            return Ok(None);
        };

        let session = self.session().await?;
        let movie = movies::Entity::find_by_id(id).one(&session).await?;
        session.commit().await?;

        debug!(movie_id, found = movie.is_some(), "looked up movie");
        Ok(movie)
    }
}
