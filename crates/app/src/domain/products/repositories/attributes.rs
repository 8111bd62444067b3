//! Attributes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::products::{
    data::NewAttribute,
    records::{AttributeRecord, AttributeValueRecord, AttributeValueUuid},
};

const CREATE_ATTRIBUTE_SQL: &str = include_str!("../sql/create_attribute.sql");
const CREATE_ATTRIBUTE_VALUES_SQL: &str = include_str!("../sql/create_attribute_values.sql");
const FIND_ATTRIBUTE_VALUES_SQL: &str = include_str!("../sql/find_attribute_values.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAttributesRepository;

impl PgAttributesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_attribute(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        attribute: NewAttribute,
    ) -> Result<AttributeRecord, sqlx::Error> {
        let created_at: SqlxTimestamp = query_scalar(CREATE_ATTRIBUTE_SQL)
            .bind(attribute.uuid)
            .bind(&attribute.name)
            .fetch_one(&mut **tx)
            .await?;

        let (uuids, values): (Vec<Uuid>, Vec<String>) = attribute
            .values
            .into_iter()
            .map(|value| (value.uuid.into_uuid(), value.value))
            .unzip();

        let values = query_as::<Postgres, AttributeValueRecord>(CREATE_ATTRIBUTE_VALUES_SQL)
            .bind(attribute.uuid)
            .bind(&uuids)
            .bind(&values)
            .fetch_all(&mut **tx)
            .await?;

        Ok(AttributeRecord {
            uuid: attribute.uuid,
            name: attribute.name,
            values,
            created_at: created_at.to_jiff(),
        })
    }

    /// Look up attribute values by id; unknown ids are absent from the result.
    pub(crate) async fn find_attribute_values(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        values: &[AttributeValueUuid],
    ) -> Result<Vec<AttributeValueRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = values.iter().map(|value| value.into_uuid()).collect();

        query_as::<Postgres, AttributeValueRecord>(FIND_ATTRIBUTE_VALUES_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AttributeValueRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            attribute_uuid: row.try_get("attribute_uuid")?,
            value: row.try_get("value")?,
        })
    }
}
