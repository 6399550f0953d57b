use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::appointments::{
    AppointmentEntity, InsertAppointmentEntity, UpdateAppointmentEntity,
};

#[automock]
#[async_trait]
pub trait AppointmentRepository {
    async fn create_appointment(
        &self,
        appointment: InsertAppointmentEntity,
    ) -> Result<AppointmentEntity>;

    async fn find_appointment(&self, appointment_id: Uuid) -> Result<Option<AppointmentEntity>>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AppointmentEntity>>;

    async fn update_appointment(
        &self,
        appointment_id: Uuid,
        changes: UpdateAppointmentEntity,
    ) -> Result<Option<AppointmentEntity>>;

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool>;
}
