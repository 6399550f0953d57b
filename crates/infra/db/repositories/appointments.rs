use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::appointments},
};
use domain::{
    entities::appointments::{AppointmentEntity, InsertAppointmentEntity, UpdateAppointmentEntity},
    repositories::appointments::AppointmentRepository,
};

pub struct AppointmentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AppointmentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentPostgres {
    async fn create_appointment(
        &self,
        appointment: InsertAppointmentEntity,
    ) -> Result<AppointmentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(appointments::table)
            .values(&appointment)
            .returning(AppointmentEntity::as_returning())
            .get_result::<AppointmentEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_appointment(&self, appointment_id: Uuid) -> Result<Option<AppointmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = appointments::table
            .filter(appointments::id.eq(appointment_id))
            .select(AppointmentEntity::as_select())
            .first::<AppointmentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AppointmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = appointments::table
            .filter(
                appointments::student_id
                    .eq(user_id)
                    .or(appointments::therapist_id.eq(user_id)),
            )
            .select(AppointmentEntity::as_select())
            .order(appointments::appointment_date.asc())
            .load::<AppointmentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_appointment(
        &self,
        appointment_id: Uuid,
        changes: UpdateAppointmentEntity,
    ) -> Result<Option<AppointmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(appointments::table.filter(appointments::id.eq(appointment_id)))
            .set(&changes)
            .returning(AppointmentEntity::as_returning())
            .get_result::<AppointmentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(appointments::table.filter(appointments::id.eq(appointment_id)))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
