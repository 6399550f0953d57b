use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::conversations::{ConversationEntity, MessageEntity},
    value_objects::{
        participants::ParticipantName,
        validation::{ValidationError, required, required_text},
    },
};

pub const MAX_MESSAGE_LENGTH: usize = 5_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationEntity> for ConversationModel {
    fn from(entity: ConversationEntity) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            therapist_id: entity.therapist_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversationView {
    #[serde(flatten)]
    pub conversation: ConversationModel,
    pub student: Option<ParticipantName>,
    pub therapist: Option<ParticipantName>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationModel {
    pub student_id: Option<Uuid>,
    pub therapist_id: Option<Uuid>,
}

impl CreateConversationModel {
    pub fn validate(self) -> Result<(Uuid, Uuid), ValidationError> {
        Ok((
            required(self.student_id, "student_id")?,
            required(self.therapist_id, "therapist_id")?,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageModel {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<MessageEntity> for MessageModel {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            conversation_id: entity.conversation_id,
            sender_id: entity.sender_id,
            receiver_id: entity.receiver_id,
            content: entity.content,
            sent_at: entity.sent_at,
            is_read: entity.is_read,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageModel {
    pub content: Option<String>,
}

impl SendMessageModel {
    pub fn validate(self) -> Result<String, ValidationError> {
        let content = required_text(self.content, "content")?;
        if content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ValidationError::Invalid(format!(
                "content must be at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }
        Ok(content)
    }
}
