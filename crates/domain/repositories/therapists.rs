use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        therapists::{TherapistEntity, UpdateTherapistEntity},
        users::UserEntity,
        verified_licenses::VerifiedLicenseEntity,
    },
    value_objects::therapists::ListTherapistsFilter,
};

#[automock]
#[async_trait]
pub trait TherapistRepository {
    async fn find_verified_license(
        &self,
        license_number: &str,
    ) -> Result<Option<VerifiedLicenseEntity>>;

    async fn list_therapists(
        &self,
        filter: &ListTherapistsFilter,
    ) -> Result<Vec<(TherapistEntity, UserEntity)>>;

    async fn find_therapist(
        &self,
        therapist_id: Uuid,
    ) -> Result<Option<(TherapistEntity, UserEntity)>>;

    async fn update_therapist(
        &self,
        therapist_id: Uuid,
        changes: UpdateTherapistEntity,
    ) -> Result<Option<(TherapistEntity, UserEntity)>>;
}
