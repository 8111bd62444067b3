//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    addresses::{
        data::{AddressUpdate, NewAddress},
        records::{AddressRecord, AddressUuid, DefaultKind},
    },
    columns::try_get_enum,
    users::UserUuid,
};

const CREATE_ADDRESS_SQL: &str = include_str!("../sql/create_address.sql");
const GET_ADDRESS_SQL: &str = include_str!("../sql/get_address.sql");
const LIST_ADDRESSES_SQL: &str = include_str!("../sql/list_addresses.sql");
const GET_DEFAULT_ADDRESS_SQL: &str = include_str!("../sql/get_default_address.sql");
const GET_OLDEST_ADDRESS_SQL: &str = include_str!("../sql/get_oldest_address.sql");
const COUNT_ADDRESSES_SQL: &str = include_str!("../sql/count_addresses.sql");
const CLEAR_DEFAULT_SQL: &str = include_str!("../sql/clear_default.sql");
const MARK_DEFAULT_SQL: &str = include_str!("../sql/mark_default.sql");
const UPDATE_ADDRESS_SQL: &str = include_str!("../sql/update_address.sql");
const ADDRESS_IN_USE_SQL: &str = include_str!("../sql/address_in_use.sql");
const SOFT_DELETE_ADDRESS_SQL: &str = include_str!("../sql/soft_delete_address.sql");
const DELETE_ADDRESS_SQL: &str = include_str!("../sql/delete_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(CREATE_ADDRESS_SQL)
            .bind(address.uuid)
            .bind(user)
            .bind(address.kind.as_str())
            .bind(&address.full_name)
            .bind(&address.phone_number)
            .bind(&address.email)
            .bind(&address.line_1)
            .bind(&address.line_2)
            .bind(&address.region)
            .bind(&address.landmark)
            .bind(&address.notes)
            .bind(address.is_default_shipping)
            .bind(address.is_default_billing)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_ADDRESS_SQL)
            .bind(address)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Option<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_ADDRESS_SQL)
            .bind(address)
            .bind(user)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(LIST_ADDRESSES_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_default_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        kind: DefaultKind,
    ) -> Result<Option<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_DEFAULT_ADDRESS_SQL)
            .bind(user)
            .bind(kind.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_oldest_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_OLDEST_ADDRESS_SQL)
            .bind(user)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn count_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ADDRESSES_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }

    pub(crate) async fn clear_default(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        kind: DefaultKind,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_DEFAULT_SQL)
            .bind(user)
            .bind(kind.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn mark_default(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
        kind: DefaultKind,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_DEFAULT_SQL)
            .bind(address)
            .bind(user)
            .bind(kind.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
        update: &AddressUpdate,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(UPDATE_ADDRESS_SQL)
            .bind(address)
            .bind(user)
            .bind(update.kind.map(|kind| kind.as_str()))
            .bind(&update.full_name)
            .bind(&update.phone_number)
            .bind(update.email.is_some())
            .bind(update.email.clone().flatten())
            .bind(&update.line_1)
            .bind(update.line_2.is_some())
            .bind(update.line_2.clone().flatten())
            .bind(&update.region)
            .bind(update.landmark.is_some())
            .bind(update.landmark.clone().flatten())
            .bind(update.notes.is_some())
            .bind(update.notes.clone().flatten())
            .bind(update.is_default_shipping)
            .bind(update.is_default_billing)
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether any order points at the address as its billing or shipping address.
    pub(crate) async fn is_address_in_use(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(ADDRESS_IN_USE_SQL)
            .bind(address)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn soft_delete_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SOFT_DELETE_ADDRESS_SQL)
            .bind(address)
            .bind(user)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDRESS_SQL)
            .bind(address)
            .bind(user)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            kind: try_get_enum(row, "kind")?,
            full_name: row.try_get("full_name")?,
            phone_number: row.try_get("phone_number")?,
            email: row.try_get("email")?,
            line_1: row.try_get("line_1")?,
            line_2: row.try_get("line_2")?,
            region: row.try_get("region")?,
            landmark: row.try_get("landmark")?,
            notes: row.try_get("notes")?,
            is_default_shipping: row.try_get("is_default_shipping")?,
            is_default_billing: row.try_get("is_default_billing")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
