use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::therapists::UpdateTherapistEntity,
    repositories::therapists::TherapistRepository,
    value_objects::therapists::{ListTherapistsFilter, TherapistModel},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    usecases::errors::{UseCaseError, UseCaseResult},
};

pub struct TherapistUseCase<T>
where
    T: TherapistRepository + Send + Sync + 'static,
{
    therapist_repo: Arc<T>,
}

impl<T> TherapistUseCase<T>
where
    T: TherapistRepository + Send + Sync + 'static,
{
    pub fn new(therapist_repo: Arc<T>) -> Self {
        Self { therapist_repo }
    }

    pub async fn list(&self, filter: ListTherapistsFilter) -> UseCaseResult<Vec<TherapistModel>> {
        let therapists = self
            .therapist_repo
            .list_therapists(&filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "therapists: failed to list therapists");
                UseCaseError::Internal(err)
            })?;

        info!(count = therapists.len(), "therapists: listed therapists");
        Ok(therapists.into_iter().map(TherapistModel::from).collect())
    }

    pub async fn get(&self, therapist_id: Uuid) -> UseCaseResult<TherapistModel> {
        self.therapist_repo
            .find_therapist(therapist_id)
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "therapists: failed to load therapist");
                UseCaseError::Internal(err)
            })?
            .map(TherapistModel::from)
            .ok_or_else(|| UseCaseError::NotFound("therapist not found".to_string()))
    }

    pub async fn update_settings(
        &self,
        caller: &AuthUser,
        changes: UpdateTherapistEntity,
    ) -> UseCaseResult<TherapistModel> {
        self.apply(caller, changes).await
    }

    pub async fn set_availability(
        &self,
        caller: &AuthUser,
        available: bool,
    ) -> UseCaseResult<TherapistModel> {
        let changes = UpdateTherapistEntity {
            available: Some(available),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        self.apply(caller, changes).await
    }

    async fn apply(
        &self,
        caller: &AuthUser,
        changes: UpdateTherapistEntity,
    ) -> UseCaseResult<TherapistModel> {
        if !caller.is_therapist() {
            return Err(UseCaseError::Forbidden(
                "only therapists can change therapist settings".to_string(),
            ));
        }

        let therapist_id = caller.user_id;
        info!(%therapist_id, "therapists: updating therapist settings");

        self.therapist_repo
            .update_therapist(therapist_id, changes)
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "therapists: failed to update settings");
                UseCaseError::Internal(err)
            })?
            .map(TherapistModel::from)
            .ok_or_else(|| UseCaseError::NotFound("therapist profile not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        entities::{therapists::TherapistEntity, users::UserEntity},
        repositories::therapists::MockTherapistRepository,
        value_objects::enums::user_roles::UserRole,
    };
    use mockall::predicate::eq;

    fn caller(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "t@x.com".to_string(),
            role,
        }
    }

    fn therapist_row(user_id: Uuid, available: bool) -> (TherapistEntity, UserEntity) {
        let now = Utc::now();
        (
            TherapistEntity {
                user_id,
                license_number: "L123".to_string(),
                specialization: "CBT".to_string(),
                experience_years: 5,
                monthly_rate: 40_000,
                available,
                created_at: now,
                updated_at: now,
            },
            UserEntity {
                id: user_id,
                first_name: "Carl".to_string(),
                last_name: "Rogers".to_string(),
                gender: None,
                role: "therapist".to_string(),
                profile_picture: None,
                created_at: now,
                updated_at: now,
            },
        )
    }

    #[tokio::test]
    async fn students_cannot_toggle_availability() {
        let mut repo = MockTherapistRepository::new();
        repo.expect_update_therapist().never();

        let usecase = TherapistUseCase::new(Arc::new(repo));
        let err = usecase
            .set_availability(&caller(UserRole::Student), false)
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Forbidden(_)));
    }

    #[tokio::test]
    async fn availability_toggle_only_touches_available() {
        let me = caller(UserRole::Therapist);
        let row = therapist_row(me.user_id, false);

        let mut repo = MockTherapistRepository::new();
        repo.expect_update_therapist()
            .withf(|_, changes| {
                changes.available == Some(false)
                    && changes.specialization.is_none()
                    && changes.monthly_rate.is_none()
            })
            .returning(move |_, _| Ok(Some(row.clone())));

        let usecase = TherapistUseCase::new(Arc::new(repo));
        let model = usecase.set_availability(&me, false).await.unwrap();

        assert!(!model.available);
        assert_eq!(model.id, me.user_id);
    }

    #[tokio::test]
    async fn unknown_therapist_is_not_found() {
        let therapist_id = Uuid::new_v4();
        let mut repo = MockTherapistRepository::new();
        repo.expect_find_therapist()
            .with(eq(therapist_id))
            .returning(|_| Ok(None));

        let usecase = TherapistUseCase::new(Arc::new(repo));
        let err = usecase.get(therapist_id).await.unwrap_err();

        assert!(matches!(err, UseCaseError::NotFound(_)));
    }
}
