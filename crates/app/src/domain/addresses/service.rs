//! Address book service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, debug, info};

use crate::{
    database::Db,
    domain::{
        addresses::{
            data::{AddressUpdate, NewAddress},
            errors::AddressesServiceError,
            records::{AddressRecord, AddressUuid, DefaultKind},
            repositories::PgAddressesRepository,
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    #[tracing::instrument(
        name = "addresses.service.create_address",
        skip(self, address),
        fields(user_uuid = %user, address_uuid = %address.uuid, first_address = tracing::field::Empty),
        err
    )]
    async fn create_address(
        &self,
        user: UserUuid,
        mut address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let first_address = self.repository.count_addresses(&mut tx, user).await? == 0;

        Span::current().record("first_address", first_address);

        if first_address {
            address.is_default_shipping = true;
            address.is_default_billing = true;
        }

        if address.is_default_shipping {
            self.repository
                .clear_default(&mut tx, user, DefaultKind::Shipping)
                .await?;
        }

        if address.is_default_billing {
            self.repository
                .clear_default(&mut tx, user, DefaultKind::Billing)
                .await?;
        }

        let created = self
            .repository
            .create_address(&mut tx, user, address)
            .await?;

        tx.commit().await?;

        info!(address_uuid = %created.uuid, "created address");

        Ok(created)
    }

    #[tracing::instrument(
        name = "addresses.service.update_address",
        skip(self, update),
        fields(user_uuid = %user, address_uuid = %address),
        err
    )]
    async fn update_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_address(&mut tx, user, address).await?;

        for kind in update.promoted_defaults() {
            if !existing.is_default(kind) {
                self.repository.clear_default(&mut tx, user, kind).await?;
            }
        }

        let updated = self
            .repository
            .update_address(&mut tx, user, address, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "addresses.service.set_default",
        skip(self),
        fields(user_uuid = %user, address_uuid = %address),
        err
    )]
    async fn set_default(
        &self,
        user: UserUuid,
        address: AddressUuid,
        kind: DefaultKind,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_address(&mut tx, user, address).await?;

        if !existing.is_default(kind) {
            self.repository.clear_default(&mut tx, user, kind).await?;
            self.repository
                .mark_default(&mut tx, user, address, kind)
                .await?;
        }

        let updated = self.repository.get_address(&mut tx, user, address).await?;

        tx.commit().await?;

        info!(address_uuid = %address, kind = kind.as_str(), "set default address");

        Ok(updated)
    }

    #[tracing::instrument(name = "addresses.service.get_address", skip(self), err)]
    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.get_address(&mut tx, user, address).await?;

        tx.commit().await?;

        Ok(address)
    }

    #[tracing::instrument(name = "addresses.service.list_addresses", skip(self), err)]
    async fn list_addresses(
        &self,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let addresses = self.repository.list_addresses(&mut tx, user).await?;

        tx.commit().await?;

        Ok(addresses)
    }

    #[tracing::instrument(name = "addresses.service.default_address", skip(self), err)]
    async fn default_address(
        &self,
        user: UserUuid,
        kind: DefaultKind,
    ) -> Result<Option<AddressRecord>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self
            .repository
            .get_default_address(&mut tx, user, kind)
            .await?;

        tx.commit().await?;

        Ok(address)
    }

    #[tracing::instrument(
        name = "addresses.service.delete_address",
        skip(self),
        fields(user_uuid = %user, address_uuid = %address, soft = tracing::field::Empty),
        err
    )]
    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_address(&mut tx, user, address).await?;

        let soft = self.repository.is_address_in_use(&mut tx, address).await?;

        Span::current().record("soft", soft);

        let rows_affected = if soft {
            self.repository
                .soft_delete_address(&mut tx, user, address)
                .await?
        } else {
            self.repository.delete_address(&mut tx, user, address).await?
        };

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        let held: Vec<DefaultKind> = [DefaultKind::Shipping, DefaultKind::Billing]
            .into_iter()
            .filter(|kind| existing.is_default(*kind))
            .collect();

        if !held.is_empty()
            && let Some(oldest) = self.repository.get_oldest_address(&mut tx, user).await?
        {
            for kind in held {
                self.repository
                    .mark_default(&mut tx, user, oldest.uuid, kind)
                    .await?;

                debug!(address_uuid = %oldest.uuid, kind = kind.as_str(), "reassigned default address");
            }
        }

        tx.commit().await?;

        info!(address_uuid = %address, soft, "deleted address");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// Adds an address. A user's first address becomes both defaults.
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Applies the fields set on `update`.
    async fn update_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Makes the address the user's default of the given kind.
    async fn set_default(
        &self,
        user: UserUuid,
        address: AddressUuid,
        kind: DefaultKind,
    ) -> Result<AddressRecord, AddressesServiceError>;

    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Defaults first, then newest.
    async fn list_addresses(
        &self,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError>;

    async fn default_address(
        &self,
        user: UserUuid,
        kind: DefaultKind,
    ) -> Result<Option<AddressRecord>, AddressesServiceError>;

    /// Removes an address, keeping it as a soft-deleted row while orders still refer to it.
    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError>;
}
