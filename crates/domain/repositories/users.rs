use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        auth_credentials::AuthCredentialEntity,
        therapists::InsertTherapistEntity,
        users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    },
    value_objects::outcomes::CreateOutcome,
};

#[automock]
#[async_trait]
pub trait UserRepository {
    /// Inserts the user and its credential in one transaction.
    async fn register_student(
        &self,
        user: InsertUserEntity,
        email: String,
        password_hash: String,
    ) -> Result<CreateOutcome<UserEntity>>;

    /// Inserts user, credential and therapist profile in one transaction.
    /// `therapist.user_id` is overwritten with the new user's id.
    async fn register_therapist(
        &self,
        user: InsertUserEntity,
        email: String,
        password_hash: String,
        therapist: InsertTherapistEntity,
    ) -> Result<CreateOutcome<UserEntity>>;

    async fn find_credential_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(UserEntity, AuthCredentialEntity)>>;

    async fn find_user_with_email(&self, user_id: Uuid) -> Result<Option<(UserEntity, String)>>;

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: UpdateUserEntity,
    ) -> Result<Option<UserEntity>>;

    async fn delete_user(&self, user_id: Uuid) -> Result<bool>;
}
