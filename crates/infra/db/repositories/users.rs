use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        constraints::unique_violation_message,
        postgres_connection::PgPoolSquad,
        schema::{auth_credentials, relationships, therapists, users},
    },
};
use domain::{
    entities::{
        auth_credentials::{AuthCredentialEntity, InsertAuthCredentialEntity},
        therapists::InsertTherapistEntity,
        users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    },
    repositories::users::UserRepository,
    value_objects::{enums::relationship_statuses::RelationshipStatus, outcomes::CreateOutcome},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn insert_user_with_credential(
        tx: &mut PgConnection,
        user: &InsertUserEntity,
        email: String,
        password_hash: String,
    ) -> std::result::Result<UserEntity, diesel::result::Error> {
        let user = insert_into(users::table)
            .values(user)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(tx)?;

        insert_into(auth_credentials::table)
            .values(&InsertAuthCredentialEntity {
                user_id: user.id,
                email,
                password_hash,
            })
            .execute(tx)?;

        Ok(user)
    }
}

fn into_outcome(
    result: std::result::Result<UserEntity, diesel::result::Error>,
) -> Result<CreateOutcome<UserEntity>> {
    match result {
        Ok(user) => Ok(CreateOutcome::Created(user)),
        Err(err) => match unique_violation_message(&err) {
            Some(message) => Ok(CreateOutcome::AlreadyExists(message)),
            None => Err(err.into()),
        },
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn register_student(
        &self,
        user: InsertUserEntity,
        email: String,
        password_hash: String,
    ) -> Result<CreateOutcome<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<UserEntity, diesel::result::Error, _>(|tx| {
            Self::insert_user_with_credential(tx, &user, email, password_hash)
        });

        into_outcome(result)
    }

    async fn register_therapist(
        &self,
        user: InsertUserEntity,
        email: String,
        password_hash: String,
        mut therapist: InsertTherapistEntity,
    ) -> Result<CreateOutcome<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<UserEntity, diesel::result::Error, _>(|tx| {
            let user = Self::insert_user_with_credential(tx, &user, email, password_hash)?;

            therapist.user_id = user.id;
            insert_into(therapists::table)
                .values(&therapist)
                .execute(tx)?;

            Ok(user)
        });

        into_outcome(result)
    }

    async fn find_credential_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(UserEntity, AuthCredentialEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = auth_credentials::table
            .inner_join(users::table.on(auth_credentials::user_id.eq(users::id)))
            .filter(auth_credentials::email.eq(email))
            .select((UserEntity::as_select(), AuthCredentialEntity::as_select()))
            .first::<(UserEntity, AuthCredentialEntity)>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_user_with_email(&self, user_id: Uuid) -> Result<Option<(UserEntity, String)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .inner_join(auth_credentials::table.on(auth_credentials::user_id.eq(users::id)))
            .filter(users::id.eq(user_id))
            .select((UserEntity::as_select(), auth_credentials::email))
            .first::<(UserEntity, String)>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: UpdateUserEntity,
    ) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(users::table.filter(users::id.eq(user_id)))
            .set(&changes)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = conn.transaction::<usize, diesel::result::Error, _>(|tx| {
            let now = Utc::now();

            // Students of a departing therapist lose the pairing entirely.
            update(relationships::table.filter(relationships::current_therapist_id.eq(user_id)))
                .set((
                    relationships::current_therapist_id.eq(None::<Uuid>),
                    relationships::requested_therapist_id.eq(None::<Uuid>),
                    relationships::status.eq(RelationshipStatus::Ended.to_string()),
                    relationships::updated_at.eq(now),
                ))
                .execute(tx)?;

            // A switch towards a departing therapist falls back to the current one.
            update(
                relationships::table
                    .filter(relationships::requested_therapist_id.eq(user_id))
                    .filter(relationships::status.eq(RelationshipStatus::Pending.to_string())),
            )
            .set((
                relationships::requested_therapist_id.eq(None::<Uuid>),
                relationships::status.eq(RelationshipStatus::Active.to_string()),
                relationships::updated_at.eq(now),
            ))
            .execute(tx)?;

            // Everything else owned by the user goes through ON DELETE CASCADE.
            delete(users::table.filter(users::id.eq(user_id))).execute(tx)
        })?;

        Ok(deleted > 0)
    }
}
