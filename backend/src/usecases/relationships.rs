use std::{collections::HashMap, sync::Arc};

use crates::domain::{
    entities::relationships::RelationshipEntity,
    repositories::{
        participants::ParticipantRepository, relationships::RelationshipRepository,
        therapists::TherapistRepository,
    },
    value_objects::{
        enums::relationship_statuses::RelationshipStatus,
        outcomes::CreateOutcome,
        participants::ParticipantName,
        relationships::{RelationshipModel, RelationshipView},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    usecases::errors::{UseCaseError, UseCaseResult},
};

/// Student/therapist pairing and the switch workflow.
///
/// Transitions are single guarded writes in the repository. When a guard
/// misses, the row is read again so the caller gets 404 for a missing row
/// and 409 for a row in the wrong state.
pub struct RelationshipUseCase<R, T, P>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    relationship_repo: Arc<R>,
    therapist_repo: Arc<T>,
    participant_repo: Arc<P>,
}

impl<R, T, P> RelationshipUseCase<R, T, P>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    pub fn new(relationship_repo: Arc<R>, therapist_repo: Arc<T>, participant_repo: Arc<P>) -> Self {
        Self {
            relationship_repo,
            therapist_repo,
            participant_repo,
        }
    }

    pub async fn assign(
        &self,
        caller: &AuthUser,
        student_id: Uuid,
        therapist_id: Uuid,
    ) -> UseCaseResult<RelationshipView> {
        info!(%student_id, %therapist_id, "relationships: assign requested");

        if caller.user_id != student_id && caller.user_id != therapist_id {
            return Err(UseCaseError::Forbidden(
                "only the student or the therapist can create this relationship".to_string(),
            ));
        }

        self.ensure_therapist_exists(therapist_id).await?;

        let outcome = self
            .relationship_repo
            .assign(student_id, therapist_id)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "relationships: failed to assign therapist");
                UseCaseError::Internal(err)
            })?;

        match outcome {
            CreateOutcome::Created(row) => {
                info!(%student_id, %therapist_id, "relationships: therapist assigned");
                self.view(row).await
            }
            CreateOutcome::AlreadyExists(message) => {
                warn!(%student_id, "relationships: live relationship already exists");
                Err(UseCaseError::Conflict(message))
            }
        }
    }

    pub async fn get(&self, caller: &AuthUser, student_id: Uuid) -> UseCaseResult<RelationshipView> {
        let row = self.load(student_id).await?;

        let involved = caller.user_id == row.student_id
            || row.current_therapist_id == Some(caller.user_id)
            || row.requested_therapist_id == Some(caller.user_id);
        if !involved {
            return Err(UseCaseError::Forbidden(
                "not a participant of this relationship".to_string(),
            ));
        }

        self.view(row).await
    }

    pub async fn list_for_therapist(
        &self,
        caller: &AuthUser,
        therapist_id: Uuid,
    ) -> UseCaseResult<Vec<RelationshipView>> {
        if caller.user_id != therapist_id {
            return Err(UseCaseError::Forbidden(
                "therapists can only list their own relationships".to_string(),
            ));
        }

        let rows = self
            .relationship_repo
            .list_for_therapist(therapist_id)
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "relationships: failed to list for therapist");
                UseCaseError::Internal(err)
            })?;

        let names = self
            .names(rows.iter().flat_map(participant_ids).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| build_view(row, &names))
            .collect())
    }

    pub async fn request_switch(
        &self,
        caller: &AuthUser,
        student_id: Uuid,
        requested_therapist_id: Uuid,
    ) -> UseCaseResult<RelationshipView> {
        info!(%student_id, %requested_therapist_id, "relationships: switch requested");

        if caller.user_id != student_id {
            return Err(UseCaseError::Forbidden(
                "only the student can request a switch".to_string(),
            ));
        }

        let row = self.load(student_id).await?;
        if row.current_therapist_id == Some(requested_therapist_id) {
            return Err(UseCaseError::Validation(
                "requested therapist is already the current therapist".to_string(),
            ));
        }

        self.ensure_therapist_exists(requested_therapist_id).await?;

        let updated = self
            .relationship_repo
            .request_switch(student_id, requested_therapist_id)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "relationships: failed to request switch");
                UseCaseError::Internal(err)
            })?;

        match updated {
            Some(row) => self.view(row).await,
            None => Err(self.guard_missed(student_id, "request a switch").await),
        }
    }

    pub async fn approve_switch(
        &self,
        caller: &AuthUser,
        student_id: Uuid,
    ) -> UseCaseResult<RelationshipView> {
        info!(%student_id, approver = %caller.user_id, "relationships: approving switch");

        let row = self.load(student_id).await?;
        if row.requested_therapist_id != Some(caller.user_id) {
            return Err(UseCaseError::Forbidden(
                "only the requested therapist can approve the switch".to_string(),
            ));
        }

        let updated = self
            .relationship_repo
            .approve_switch(student_id)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "relationships: failed to approve switch");
                UseCaseError::Internal(err)
            })?;

        match updated {
            Some(row) => {
                info!(%student_id, "relationships: switch approved");
                self.view(row).await
            }
            None => Err(self.guard_missed(student_id, "approve the switch").await),
        }
    }

    pub async fn reject_switch(
        &self,
        caller: &AuthUser,
        student_id: Uuid,
    ) -> UseCaseResult<RelationshipView> {
        info!(%student_id, rejecter = %caller.user_id, "relationships: rejecting switch");

        let row = self.load(student_id).await?;
        let may_reject = row.requested_therapist_id == Some(caller.user_id)
            || row.current_therapist_id == Some(caller.user_id);
        if !may_reject {
            return Err(UseCaseError::Forbidden(
                "only an involved therapist can reject the switch".to_string(),
            ));
        }

        let updated = self
            .relationship_repo
            .reject_switch(student_id)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "relationships: failed to reject switch");
                UseCaseError::Internal(err)
            })?;

        match updated {
            Some(row) => self.view(row).await,
            None => Err(self.guard_missed(student_id, "reject the switch").await),
        }
    }

    pub async fn end(&self, caller: &AuthUser, student_id: Uuid) -> UseCaseResult<RelationshipView> {
        info!(%student_id, "relationships: ending relationship");

        let row = self.load(student_id).await?;
        if caller.user_id != student_id && row.current_therapist_id != Some(caller.user_id) {
            return Err(UseCaseError::Forbidden(
                "only the student or the current therapist can end the relationship".to_string(),
            ));
        }

        let updated = self.relationship_repo.end(student_id).await.map_err(|err| {
            error!(%student_id, db_error = ?err, "relationships: failed to end relationship");
            UseCaseError::Internal(err)
        })?;

        match updated {
            Some(row) => self.view(row).await,
            None => Err(self.guard_missed(student_id, "end the relationship").await),
        }
    }

    async fn load(&self, student_id: Uuid) -> UseCaseResult<RelationshipEntity> {
        self.relationship_repo
            .find_by_student(student_id)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "relationships: failed to load relationship");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("relationship not found".to_string()))
    }

    async fn guard_missed(&self, student_id: Uuid, action: &str) -> UseCaseError {
        match self.load(student_id).await {
            Ok(row) => {
                let status = RelationshipStatus::from_str(&row.status);
                warn!(%student_id, %status, action, "relationships: transition not allowed");
                UseCaseError::Conflict(format!(
                    "cannot {} while the relationship is {}",
                    action, status
                ))
            }
            Err(err) => err,
        }
    }

    async fn ensure_therapist_exists(&self, therapist_id: Uuid) -> UseCaseResult<()> {
        let found = self
            .therapist_repo
            .find_therapist(therapist_id)
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "relationships: failed to load therapist");
                UseCaseError::Internal(err)
            })?;

        match found {
            Some(_) => Ok(()),
            None => Err(UseCaseError::NotFound("therapist not found".to_string())),
        }
    }

    async fn names(&self, ids: Vec<Uuid>) -> UseCaseResult<HashMap<Uuid, ParticipantName>> {
        self.participant_repo.find_names(ids).await.map_err(|err| {
            error!(db_error = ?err, "relationships: failed to load participant names");
            UseCaseError::Internal(err)
        })
    }

    async fn view(&self, row: RelationshipEntity) -> UseCaseResult<RelationshipView> {
        let names = self.names(participant_ids(&row)).await?;
        Ok(build_view(row, &names))
    }
}

fn participant_ids(row: &RelationshipEntity) -> Vec<Uuid> {
    std::iter::once(row.student_id)
        .chain(row.current_therapist_id)
        .chain(row.requested_therapist_id)
        .collect()
}

fn build_view(row: RelationshipEntity, names: &HashMap<Uuid, ParticipantName>) -> RelationshipView {
    let lookup = |id: Option<Uuid>| id.and_then(|id| names.get(&id).cloned());

    RelationshipView {
        student: lookup(Some(row.student_id)),
        current_therapist: lookup(row.current_therapist_id),
        requested_therapist: lookup(row.requested_therapist_id),
        relationship: RelationshipModel::from(row),
    }
}
