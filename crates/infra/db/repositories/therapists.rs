use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{therapists, users, verified_licenses},
    },
};
use domain::{
    entities::{
        therapists::{TherapistEntity, UpdateTherapistEntity},
        users::UserEntity,
        verified_licenses::VerifiedLicenseEntity,
    },
    repositories::therapists::TherapistRepository,
    value_objects::therapists::ListTherapistsFilter,
};

pub struct TherapistPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TherapistPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TherapistRepository for TherapistPostgres {
    async fn find_verified_license(
        &self,
        license_number: &str,
    ) -> Result<Option<VerifiedLicenseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = verified_licenses::table
            .filter(verified_licenses::license_number.eq(license_number))
            .select(VerifiedLicenseEntity::as_select())
            .first::<VerifiedLicenseEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_therapists(
        &self,
        filter: &ListTherapistsFilter,
    ) -> Result<Vec<(TherapistEntity, UserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = therapists::table
            .inner_join(users::table.on(therapists::user_id.eq(users::id)))
            .select((TherapistEntity::as_select(), UserEntity::as_select()))
            .into_boxed();

        if let Some(available) = filter.available {
            query = query.filter(therapists::available.eq(available));
        }

        if let Some(specialization) = filter.specialization.as_deref() {
            query = query.filter(therapists::specialization.ilike(format!("%{}%", specialization)));
        }

        let results = query
            .order((users::last_name.asc(), users::first_name.asc()))
            .load::<(TherapistEntity, UserEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn find_therapist(
        &self,
        therapist_id: Uuid,
    ) -> Result<Option<(TherapistEntity, UserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = therapists::table
            .inner_join(users::table.on(therapists::user_id.eq(users::id)))
            .filter(therapists::user_id.eq(therapist_id))
            .select((TherapistEntity::as_select(), UserEntity::as_select()))
            .first::<(TherapistEntity, UserEntity)>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_therapist(
        &self,
        therapist_id: Uuid,
        changes: UpdateTherapistEntity,
    ) -> Result<Option<(TherapistEntity, UserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(therapists::table.filter(therapists::user_id.eq(therapist_id)))
            .set(&changes)
            .returning(TherapistEntity::as_returning())
            .get_result::<TherapistEntity>(&mut conn)
            .optional()?;

        let Some(therapist) = updated else {
            return Ok(None);
        };

        let user = users::table
            .filter(users::id.eq(therapist.user_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)?;

        Ok(Some((therapist, user)))
    }
}
