//! Categories Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::products::{
    data::NewCategory,
    records::{CategoryRecord, CategoryUuid},
};

const CREATE_CATEGORY_SQL: &str = include_str!("../sql/create_category.sql");
const COUNT_CATEGORIES_SQL: &str = include_str!("../sql/count_categories.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCategoriesRepository;

impl PgCategoriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: NewCategory,
    ) -> Result<CategoryRecord, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(CREATE_CATEGORY_SQL)
            .bind(category.uuid)
            .bind(category.name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        categories: &[CategoryUuid],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = categories
            .iter()
            .map(|category| category.into_uuid())
            .collect();

        let count: i64 = query_scalar(COUNT_CATEGORIES_SQL)
            .bind(&uuids)
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }
}

impl<'r> FromRow<'r, PgRow> for CategoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
