use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    Connection, OptionalExtension, RunQueryDsl, dsl::count_star, insert_into, prelude::*, update,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{conversations, messages},
    },
};
use domain::{
    entities::conversations::{
        ConversationEntity, InsertConversationEntity, InsertMessageEntity, MessageEntity,
    },
    repositories::conversations::ConversationRepository,
};

pub struct ConversationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ConversationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ConversationRepository for ConversationPostgres {
    async fn upsert_conversation(
        &self,
        student_id: Uuid,
        therapist_id: Uuid,
    ) -> Result<ConversationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(conversations::table)
            .values(&InsertConversationEntity {
                student_id,
                therapist_id,
            })
            .on_conflict((conversations::student_id, conversations::therapist_id))
            .do_update()
            .set(conversations::updated_at.eq(Utc::now()))
            .returning(ConversationEntity::as_returning())
            .get_result::<ConversationEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_conversation(&self, conversation_id: Uuid) -> Result<Option<ConversationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conversations::table
            .filter(conversations::id.eq(conversation_id))
            .select(ConversationEntity::as_select())
            .first::<ConversationEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = conversations::table
            .filter(
                conversations::student_id
                    .eq(user_id)
                    .or(conversations::therapist_id.eq(user_id)),
            )
            .select(ConversationEntity::as_select())
            .order(conversations::updated_at.desc())
            .load::<ConversationEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<Vec<(Uuid, i64)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = messages::table
            .filter(messages::receiver_id.eq(user_id))
            .filter(messages::is_read.eq(false))
            .group_by(messages::conversation_id)
            .select((messages::conversation_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)?;

        Ok(results)
    }

    async fn insert_message(&self, message: InsertMessageEntity) -> Result<MessageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<MessageEntity, diesel::result::Error, _>(|tx| {
            let inserted = insert_into(messages::table)
                .values(&message)
                .returning(MessageEntity::as_returning())
                .get_result::<MessageEntity>(tx)?;

            update(conversations::table.filter(conversations::id.eq(message.conversation_id)))
                .set(conversations::updated_at.eq(inserted.sent_at))
                .execute(tx)?;

            Ok(inserted)
        })?;

        Ok(result)
    }

    async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<MessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = messages::table
            .filter(messages::conversation_id.eq(conversation_id))
            .select(MessageEntity::as_select())
            .order((messages::sent_at.asc(), messages::id.asc()))
            .load::<MessageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_message_read(
        &self,
        message_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<MessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(
            messages::table
                .filter(messages::id.eq(message_id))
                .filter(messages::receiver_id.eq(receiver_id)),
        )
        .set(messages::is_read.eq(true))
        .returning(MessageEntity::as_returning())
        .get_result::<MessageEntity>(&mut conn)
        .optional()?;

        Ok(result)
    }

    async fn mark_conversation_read(
        &self,
        conversation_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(
            messages::table
                .filter(messages::conversation_id.eq(conversation_id))
                .filter(messages::receiver_id.eq(receiver_id))
                .filter(messages::is_read.eq(false)),
        )
        .set(messages::is_read.eq(true))
        .execute(&mut conn)?;

        Ok(updated)
    }
}
