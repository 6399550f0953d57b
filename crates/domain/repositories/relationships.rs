use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::relationships::RelationshipEntity, value_objects::outcomes::CreateOutcome,
};

/// Every transition is a single guarded write; `None` means the guard did
/// not match (missing row or wrong state).
#[automock]
#[async_trait]
pub trait RelationshipRepository {
    async fn find_by_student(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>>;

    /// Creates the row, or revives an `ended` one. Live rows are left untouched.
    async fn assign(
        &self,
        student_id: Uuid,
        therapist_id: Uuid,
    ) -> Result<CreateOutcome<RelationshipEntity>>;

    async fn request_switch(
        &self,
        student_id: Uuid,
        requested_therapist_id: Uuid,
    ) -> Result<Option<RelationshipEntity>>;

    async fn approve_switch(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>>;

    async fn reject_switch(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>>;

    async fn end(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>>;

    /// Rows where the therapist is current or requested.
    async fn list_for_therapist(&self, therapist_id: Uuid) -> Result<Vec<RelationshipEntity>>;
}
