use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::appointments::{AppointmentEntity, InsertAppointmentEntity, UpdateAppointmentEntity},
    repositories::appointments::AppointmentRepository,
    value_objects::{
        appointments::AppointmentModel, enums::appointment_statuses::AppointmentStatus,
    },
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    usecases::errors::{UseCaseError, UseCaseResult},
};

pub struct AppointmentUseCase<A>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    appointment_repo: Arc<A>,
}

impl<A> AppointmentUseCase<A>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    pub fn new(appointment_repo: Arc<A>) -> Self {
        Self { appointment_repo }
    }

    pub async fn create(
        &self,
        caller: &AuthUser,
        appointment: InsertAppointmentEntity,
    ) -> UseCaseResult<AppointmentModel> {
        if caller.user_id != appointment.student_id && caller.user_id != appointment.therapist_id {
            return Err(UseCaseError::Forbidden(
                "appointments can only be booked by their participants".to_string(),
            ));
        }

        let created = self
            .appointment_repo
            .create_appointment(appointment)
            .await
            .map_err(|err| {
                error!(user_id = %caller.user_id, db_error = ?err, "appointments: failed to create appointment");
                UseCaseError::Internal(err)
            })?;

        info!(appointment_id = %created.id, "appointments: appointment created");
        Ok(AppointmentModel::from(created))
    }

    pub async fn list(&self, caller: &AuthUser) -> UseCaseResult<Vec<AppointmentModel>> {
        let user_id = caller.user_id;
        let appointments = self
            .appointment_repo
            .list_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "appointments: failed to list appointments");
                UseCaseError::Internal(err)
            })?;

        Ok(appointments.into_iter().map(AppointmentModel::from).collect())
    }

    pub async fn get(&self, caller: &AuthUser, appointment_id: Uuid) -> UseCaseResult<AppointmentModel> {
        self.load_for_participant(caller, appointment_id)
            .await
            .map(AppointmentModel::from)
    }

    pub async fn update_status(
        &self,
        caller: &AuthUser,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> UseCaseResult<AppointmentModel> {
        info!(%appointment_id, %status, "appointments: updating status");

        let changes = UpdateAppointmentEntity {
            status: Some(status.to_string()),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        self.update(caller, appointment_id, changes).await
    }

    pub async fn update(
        &self,
        caller: &AuthUser,
        appointment_id: Uuid,
        changes: UpdateAppointmentEntity,
    ) -> UseCaseResult<AppointmentModel> {
        self.load_for_participant(caller, appointment_id).await?;

        self.appointment_repo
            .update_appointment(appointment_id, changes)
            .await
            .map_err(|err| {
                error!(%appointment_id, db_error = ?err, "appointments: failed to update appointment");
                UseCaseError::Internal(err)
            })?
            .map(AppointmentModel::from)
            .ok_or_else(|| UseCaseError::NotFound("appointment not found".to_string()))
    }

    pub async fn delete(&self, caller: &AuthUser, appointment_id: Uuid) -> UseCaseResult<()> {
        self.load_for_participant(caller, appointment_id).await?;

        let deleted = self
            .appointment_repo
            .delete_appointment(appointment_id)
            .await
            .map_err(|err| {
                error!(%appointment_id, db_error = ?err, "appointments: failed to delete appointment");
                UseCaseError::Internal(err)
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("appointment not found".to_string()));
        }

        info!(%appointment_id, "appointments: appointment deleted");
        Ok(())
    }

    async fn load_for_participant(
        &self,
        caller: &AuthUser,
        appointment_id: Uuid,
    ) -> UseCaseResult<AppointmentEntity> {
        let appointment = self
            .appointment_repo
            .find_appointment(appointment_id)
            .await
            .map_err(|err| {
                error!(%appointment_id, db_error = ?err, "appointments: failed to load appointment");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("appointment not found".to_string()))?;

        if caller.user_id != appointment.student_id && caller.user_id != appointment.therapist_id {
            return Err(UseCaseError::Forbidden(
                "not a participant of this appointment".to_string(),
            ));
        }

        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        repositories::appointments::MockAppointmentRepository,
        value_objects::enums::user_roles::UserRole,
    };
    use mockall::predicate::eq;

    fn caller(id: Uuid) -> AuthUser {
        AuthUser {
            user_id: id,
            email: "t@x.com".to_string(),
            role: UserRole::Therapist,
        }
    }

    fn appointment(student_id: Uuid, therapist_id: Uuid, status: &str) -> AppointmentEntity {
        let now = Utc::now();
        AppointmentEntity {
            id: Uuid::new_v4(),
            student_id,
            therapist_id,
            appointment_date: now,
            status: status.to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn therapist_confirms_appointment() {
        let therapist_id = Uuid::new_v4();
        let pending = appointment(Uuid::new_v4(), therapist_id, "pending");
        let appointment_id = pending.id;
        let mut confirmed = pending.clone();
        confirmed.status = "confirmed".to_string();

        let mut repo = MockAppointmentRepository::new();
        repo.expect_find_appointment()
            .with(eq(appointment_id))
            .returning(move |_| Ok(Some(pending.clone())));
        repo.expect_update_appointment()
            .withf(move |id, changes| {
                *id == appointment_id && changes.status.as_deref() == Some("confirmed")
            })
            .returning(move |_, _| Ok(Some(confirmed.clone())));

        let usecase = AppointmentUseCase::new(Arc::new(repo));
        let model = usecase
            .update_status(&caller(therapist_id), appointment_id, AppointmentStatus::Confirmed)
            .await
            .unwrap();

        assert_eq!(model.status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn booking_for_someone_else_is_forbidden() {
        let mut repo = MockAppointmentRepository::new();
        repo.expect_create_appointment().never();

        let usecase = AppointmentUseCase::new(Arc::new(repo));
        let err = usecase
            .create(
                &caller(Uuid::new_v4()),
                InsertAppointmentEntity {
                    student_id: Uuid::new_v4(),
                    therapist_id: Uuid::new_v4(),
                    appointment_date: Utc::now(),
                    status: "pending".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Forbidden(_)));
    }

    #[tokio::test]
    async fn empty_history_lists_as_empty_not_missing() {
        let user_id = Uuid::new_v4();

        let mut repo = MockAppointmentRepository::new();
        repo.expect_list_for_user()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Ok(vec![]));

        let usecase = AppointmentUseCase::new(Arc::new(repo));
        let models = usecase.list(&caller(user_id)).await.unwrap();

        assert!(models.is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_appointment_is_not_found() {
        let mut repo = MockAppointmentRepository::new();
        repo.expect_find_appointment().returning(|_| Ok(None));
        repo.expect_delete_appointment().never();

        let usecase = AppointmentUseCase::new(Arc::new(repo));
        let err = usecase
            .delete(&caller(Uuid::new_v4()), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::NotFound(_)));
    }
}
