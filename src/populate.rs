use std::{collections::HashSet, io::Read, path::Path};

use anyhow::Context;
use jiff::civil::Date;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{entities::movies, error::AppResult};

const INSERT_CHUNK: usize = 500;
const MISSING: &str = "Unknown";

/// One line of the IMDb export, in its own column names.
#[derive(Debug, Deserialize)]
struct CsvMovie {
    names: String,
    date_x: String,
    score: f64,
    genre: Option<String>,
    overview: String,
    crew: Option<String>,
    orig_title: String,
    status: String,
    orig_lang: String,
    budget_x: f64,
    revenue: f64,
    country: String,
}

impl CsvMovie {
    fn into_active_model(self, date: Date) -> movies::ActiveModel {
        let genre = self.genre.unwrap_or_else(|| MISSING.to_string()).replace('\u{a0}', "");
        movies::ActiveModel {
            id: Default::default(),
            name: Set(self.names),
            date: Set(date.to_string()),
            score: Set(self.score),
            genre: Set(genre),
            overview: Set(self.overview),
            crew: Set(self.crew.unwrap_or_else(|| MISSING.to_string())),
            orig_title: Set(self.orig_title),
            status: Set(self.status),
            orig_lang: Set(self.orig_lang),
            budget: Set(self.budget_x as i64),
            revenue: Set(self.revenue as i64),
            country: Set(self.country),
        }
    }
}

/// Release dates in the export look like `03/02/2023 `.
fn parse_release_date(raw: &str) -> Option<Date> {
    Date::strptime("%m/%d/%Y", raw.trim()).ok()
}

pub struct CsvSeeder<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CsvSeeder<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn is_populated(&self) -> AppResult<bool> {
        Ok(movies::Entity::find().count(self.db).await? > 0)
    }

    pub async fn seed_file(&self, path: &Path) -> AppResult<u64> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        self.seed(file).await
    }

    /// Loads every usable row in one transaction and returns how many were
    /// inserted. Duplicate `(names, date_x)` pairs keep their first row.
    pub async fn seed<R: Read>(&self, source: R) -> AppResult<u64> {
        let rows = read_rows(source)?;
        let total = rows.len() as u64;

        let txn = self.db.begin().await?;
        for (i, chunk) in rows.chunks(INSERT_CHUNK).enumerate() {
            movies::Entity::insert_many(chunk.to_vec()).exec(&txn).await?;
            info!(inserted = (i * INSERT_CHUNK + chunk.len()) as u64, total, "seeding movies");
        }
        txn.commit().await?;

        Ok(total)
    }
}

fn read_rows<R: Read>(source: R) -> anyhow::Result<Vec<movies::ActiveModel>> {
    let mut reader = csv::Reader::from_reader(source);
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for (line, record) in reader.deserialize::<CsvMovie>().enumerate() {
        let record = record.with_context(|| format!("reading CSV record {}", line + 1))?;

        if !seen.insert((record.names.clone(), record.date_x.clone())) {
            continue;
        }

        let Some(date) = parse_release_date(&record.date_x) else {
            warn!(
                name = %record.names,
                date = %record.date_x,
                "skipping movie with unparseable date"
            );
            continue;
        };

        rows.push(record.into_active_model(date));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use sea_orm::ActiveValue;

    use super::*;

    const SAMPLE: &str = "\
names,date_x,score,genre,overview,crew,orig_title,status,orig_lang,budget_x,revenue,country
Creed III,03/02/2023 ,73.0,\"Drama,\u{a0}Action\",Adonis has been thriving.,\"Michael B. Jordan, Adonis Creed\",Creed III,Released,English,75000000.0,271616668.0,AU
Creed III,03/02/2023 ,10.0,Drama,Duplicate row.,Nobody,Creed III,Released,English,1.0,1.0,AU
Broken Date,not-a-date,50.0,Drama,Bad date.,Someone,Broken Date,Released,English,1.0,1.0,US
Quiet Film,12/24/2022,61.0,,Nothing much happens.,,Quiet Film,Post-production,French,2000000.5,0.0,FR
";

    fn value<T: Clone + Into<sea_orm::Value>>(v: &ActiveValue<T>) -> T {
        match v {
            ActiveValue::Set(v) | ActiveValue::Unchanged(v) => v.clone(),
            ActiveValue::NotSet => panic!("value not set"),
        }
    }

    #[test]
    fn parses_us_dates() {
        assert_eq!(parse_release_date("03/02/2023 "), Some(jiff::civil::date(2023, 3, 2)));
        assert_eq!(parse_release_date("12/24/2022"), Some(jiff::civil::date(2022, 12, 24)));
        assert_eq!(parse_release_date("2023-03-02"), None);
        assert_eq!(parse_release_date(""), None);
    }

    #[test]
    fn normalises_rows() {
        let rows = read_rows(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let creed = &rows[0];
        assert_eq!(value(&creed.name), "Creed III");
        assert_eq!(value(&creed.date), "2023-03-02");
        assert_eq!(value(&creed.score), 73.0);
        assert_eq!(value(&creed.genre), "Drama,Action");
        assert_eq!(value(&creed.budget), 75_000_000);
        assert_eq!(value(&creed.revenue), 271_616_668);

        let quiet = &rows[1];
        assert_eq!(value(&quiet.genre), MISSING);
        assert_eq!(value(&quiet.crew), MISSING);
        assert_eq!(value(&quiet.budget), 2_000_000);
        assert_eq!(value(&quiet.status), "Post-production");
    }

    #[tokio::test]
    async fn seeds_empty_catalog_once() {
        let db = crate::db::connect_and_init("sqlite::memory:").await.unwrap();
        let seeder = CsvSeeder::new(&db);

        assert!(!seeder.is_populated().await.unwrap());
        assert_eq!(seeder.seed(SAMPLE.as_bytes()).await.unwrap(), 2);
        assert!(seeder.is_populated().await.unwrap());

        let first = movies::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
        assert_eq!(first.name, "Creed III");
        assert_eq!(first.country, "AU");
    }

    #[tokio::test]
    async fn seeds_from_file() {
        use std::io::Write;

        let db = crate::db::connect_and_init("sqlite::memory:").await.unwrap();
        let seeder = CsvSeeder::new(&db);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        assert_eq!(seeder.seed_file(file.path()).await.unwrap(), 2);
        assert!(seeder.seed_file(Path::new("does/not/exist.csv")).await.is_err());
    }

    #[tokio::test]
    async fn failed_seed_rolls_back() {
        let db = crate::db::connect_and_init("sqlite::memory:").await.unwrap();
        let seeder = CsvSeeder::new(&db);

        seeder.seed(SAMPLE.as_bytes()).await.unwrap();
        // Same rows again violate the (name, date) unique index.
        assert!(seeder.seed(SAMPLE.as_bytes()).await.is_err());

        assert_eq!(movies::Entity::find().count(&db).await.unwrap(), 2);
    }
}
