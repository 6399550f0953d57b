use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::conversations::{
    ConversationEntity, InsertMessageEntity, MessageEntity,
};

#[automock]
#[async_trait]
pub trait ConversationRepository {
    /// Returns the existing conversation for the pair (touching `updated_at`)
    /// or creates it.
    async fn upsert_conversation(
        &self,
        student_id: Uuid,
        therapist_id: Uuid,
    ) -> Result<ConversationEntity>;

    async fn find_conversation(&self, conversation_id: Uuid) -> Result<Option<ConversationEntity>>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationEntity>>;

    /// Unread message counts addressed to `user_id`, keyed by conversation.
    async fn count_unread(&self, user_id: Uuid) -> Result<Vec<(Uuid, i64)>>;

    async fn insert_message(&self, message: InsertMessageEntity) -> Result<MessageEntity>;

    async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<MessageEntity>>;

    async fn mark_message_read(
        &self,
        message_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<MessageEntity>>;

    async fn mark_conversation_read(&self, conversation_id: Uuid, receiver_id: Uuid)
    -> Result<usize>;
}
