use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::relationships::RelationshipEntity,
    value_objects::{
        enums::relationship_statuses::RelationshipStatus,
        participants::ParticipantName,
        validation::{ValidationError, required},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipModel {
    pub student_id: Uuid,
    pub current_therapist_id: Option<Uuid>,
    pub requested_therapist_id: Option<Uuid>,
    pub status: RelationshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RelationshipEntity> for RelationshipModel {
    fn from(entity: RelationshipEntity) -> Self {
        Self {
            student_id: entity.student_id,
            current_therapist_id: entity.current_therapist_id,
            requested_therapist_id: entity.requested_therapist_id,
            status: RelationshipStatus::from_str(&entity.status),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Relationship row with the names of everyone it references.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RelationshipView {
    #[serde(flatten)]
    pub relationship: RelationshipModel,
    pub student: Option<ParticipantName>,
    pub current_therapist: Option<ParticipantName>,
    pub requested_therapist: Option<ParticipantName>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipModel {
    pub student_id: Option<Uuid>,
    pub therapist_id: Option<Uuid>,
}

impl CreateRelationshipModel {
    pub fn validate(self) -> Result<(Uuid, Uuid), ValidationError> {
        Ok((
            required(self.student_id, "studentId")?,
            required(self.therapist_id, "therapistId")?,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSwitchModel {
    pub requested_therapist_id: Option<Uuid>,
}

impl RequestSwitchModel {
    pub fn validate(self) -> Result<Uuid, ValidationError> {
        required(self.requested_therapist_id, "requestedTherapistId")
    }
}
