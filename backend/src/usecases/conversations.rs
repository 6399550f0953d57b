use std::{collections::HashMap, sync::Arc};

use crates::domain::{
    entities::conversations::{ConversationEntity, InsertMessageEntity},
    repositories::{
        conversations::ConversationRepository, participants::ParticipantRepository,
        relationships::RelationshipRepository,
    },
    value_objects::{
        conversations::{ConversationModel, ConversationView, MessageModel},
        enums::relationship_statuses::RelationshipStatus,
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    usecases::errors::{UseCaseError, UseCaseResult},
};

pub struct ConversationUseCase<C, R, P>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    conversation_repo: Arc<C>,
    relationship_repo: Arc<R>,
    participant_repo: Arc<P>,
}

impl<C, R, P> ConversationUseCase<C, R, P>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    pub fn new(conversation_repo: Arc<C>, relationship_repo: Arc<R>, participant_repo: Arc<P>) -> Self {
        Self {
            conversation_repo,
            relationship_repo,
            participant_repo,
        }
    }

    /// Returns the pair's conversation, creating it on first contact. The
    /// therapist must be the student's current therapist on a live relationship.
    pub async fn create(
        &self,
        caller: &AuthUser,
        student_id: Uuid,
        therapist_id: Uuid,
    ) -> UseCaseResult<ConversationModel> {
        if caller.user_id != student_id && caller.user_id != therapist_id {
            return Err(UseCaseError::Forbidden(
                "not a participant of this conversation".to_string(),
            ));
        }

        let relationship = self
            .relationship_repo
            .find_by_student(student_id)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "conversations: failed to load relationship");
                UseCaseError::Internal(err)
            })?;

        let linked = relationship.is_some_and(|row| {
            RelationshipStatus::from_str(&row.status).is_live()
                && row.current_therapist_id == Some(therapist_id)
        });
        if !linked {
            warn!(%student_id, %therapist_id, "conversations: no active relationship");
            return Err(UseCaseError::Conflict("no active relationship".to_string()));
        }

        let conversation = self
            .conversation_repo
            .upsert_conversation(student_id, therapist_id)
            .await
            .map_err(|err| {
                error!(%student_id, %therapist_id, db_error = ?err, "conversations: failed to upsert conversation");
                UseCaseError::Internal(err)
            })?;

        info!(conversation_id = %conversation.id, "conversations: conversation ready");
        Ok(ConversationModel::from(conversation))
    }

    pub async fn list(&self, caller: &AuthUser) -> UseCaseResult<Vec<ConversationView>> {
        let user_id = caller.user_id;

        let conversations = self
            .conversation_repo
            .list_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "conversations: failed to list conversations");
                UseCaseError::Internal(err)
            })?;

        let unread: HashMap<Uuid, i64> = self
            .conversation_repo
            .count_unread(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "conversations: failed to count unread messages");
                UseCaseError::Internal(err)
            })?
            .into_iter()
            .collect();

        let ids = conversations
            .iter()
            .flat_map(|c| [c.student_id, c.therapist_id])
            .collect();
        let names = self.participant_repo.find_names(ids).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "conversations: failed to load participant names");
            UseCaseError::Internal(err)
        })?;

        Ok(conversations
            .into_iter()
            .map(|conversation| ConversationView {
                student: names.get(&conversation.student_id).cloned(),
                therapist: names.get(&conversation.therapist_id).cloned(),
                unread_count: unread.get(&conversation.id).copied().unwrap_or(0),
                conversation: ConversationModel::from(conversation),
            })
            .collect())
    }

    pub async fn list_messages(
        &self,
        caller: &AuthUser,
        conversation_id: Uuid,
    ) -> UseCaseResult<Vec<MessageModel>> {
        self.load_for_participant(caller, conversation_id).await?;

        let messages = self
            .conversation_repo
            .list_messages(conversation_id)
            .await
            .map_err(|err| {
                error!(%conversation_id, db_error = ?err, "conversations: failed to list messages");
                UseCaseError::Internal(err)
            })?;

        Ok(messages.into_iter().map(MessageModel::from).collect())
    }

    pub async fn send_message(
        &self,
        caller: &AuthUser,
        conversation_id: Uuid,
        content: String,
    ) -> UseCaseResult<MessageModel> {
        let conversation = self.load_for_participant(caller, conversation_id).await?;

        let receiver_id = if caller.user_id == conversation.student_id {
            conversation.therapist_id
        } else {
            conversation.student_id
        };

        let message = self
            .conversation_repo
            .insert_message(InsertMessageEntity {
                conversation_id,
                sender_id: caller.user_id,
                receiver_id,
                content,
            })
            .await
            .map_err(|err| {
                error!(%conversation_id, db_error = ?err, "conversations: failed to send message");
                UseCaseError::Internal(err)
            })?;

        info!(%conversation_id, message_id = %message.id, "conversations: message sent");
        Ok(MessageModel::from(message))
    }

    /// Only the receiver can mark a message read; anything else is reported
    /// as not found.
    pub async fn mark_message_read(
        &self,
        caller: &AuthUser,
        message_id: Uuid,
    ) -> UseCaseResult<MessageModel> {
        self.conversation_repo
            .mark_message_read(message_id, caller.user_id)
            .await
            .map_err(|err| {
                error!(%message_id, db_error = ?err, "conversations: failed to mark message read");
                UseCaseError::Internal(err)
            })?
            .map(MessageModel::from)
            .ok_or_else(|| UseCaseError::NotFound("message not found".to_string()))
    }

    pub async fn mark_conversation_read(
        &self,
        caller: &AuthUser,
        conversation_id: Uuid,
    ) -> UseCaseResult<usize> {
        self.load_for_participant(caller, conversation_id).await?;

        let updated = self
            .conversation_repo
            .mark_conversation_read(conversation_id, caller.user_id)
            .await
            .map_err(|err| {
                error!(%conversation_id, db_error = ?err, "conversations: failed to mark conversation read");
                UseCaseError::Internal(err)
            })?;

        info!(%conversation_id, updated, "conversations: marked read");
        Ok(updated)
    }

    async fn load_for_participant(
        &self,
        caller: &AuthUser,
        conversation_id: Uuid,
    ) -> UseCaseResult<ConversationEntity> {
        let conversation = self
            .conversation_repo
            .find_conversation(conversation_id)
            .await
            .map_err(|err| {
                error!(%conversation_id, db_error = ?err, "conversations: failed to load conversation");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("conversation not found".to_string()))?;

        if caller.user_id != conversation.student_id && caller.user_id != conversation.therapist_id
        {
            return Err(UseCaseError::Forbidden(
                "not a participant of this conversation".to_string(),
            ));
        }

        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crates::domain::{
        entities::{conversations::MessageEntity, relationships::RelationshipEntity},
        repositories::{
            conversations::MockConversationRepository, participants::MockParticipantRepository,
            relationships::MockRelationshipRepository,
        },
        value_objects::enums::user_roles::UserRole,
    };
    use mockall::predicate::eq;

    fn caller(id: Uuid) -> AuthUser {
        AuthUser {
            user_id: id,
            email: "a@x.com".to_string(),
            role: UserRole::Student,
        }
    }

    fn relationship(student_id: Uuid, current: Option<Uuid>, status: &str) -> RelationshipEntity {
        let now = Utc::now();
        RelationshipEntity {
            student_id,
            current_therapist_id: current,
            requested_therapist_id: None,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn conversation(student_id: Uuid, therapist_id: Uuid) -> ConversationEntity {
        let now = Utc::now();
        ConversationEntity {
            id: Uuid::new_v4(),
            student_id,
            therapist_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn usecase(
        conversations: MockConversationRepository,
        relationships: MockRelationshipRepository,
        participants: MockParticipantRepository,
    ) -> ConversationUseCase<
        MockConversationRepository,
        MockRelationshipRepository,
        MockParticipantRepository,
    > {
        ConversationUseCase::new(
            Arc::new(conversations),
            Arc::new(relationships),
            Arc::new(participants),
        )
    }

    #[tokio::test]
    async fn live_relationship_returns_the_conversation() {
        let student_id = Uuid::new_v4();
        let therapist_id = Uuid::new_v4();
        let existing = conversation(student_id, therapist_id);
        let existing_id = existing.id;

        let mut relationships = MockRelationshipRepository::new();
        relationships
            .expect_find_by_student()
            .with(eq(student_id))
            .returning(move |_| Ok(Some(relationship(student_id, Some(therapist_id), "switched"))));

        let mut conversations = MockConversationRepository::new();
        conversations
            .expect_upsert_conversation()
            .with(eq(student_id), eq(therapist_id))
            .times(1)
            .returning(move |_, _| Ok(existing.clone()));

        let usecase = usecase(conversations, relationships, MockParticipantRepository::new());
        let model = usecase
            .create(&caller(student_id), student_id, therapist_id)
            .await
            .unwrap();

        assert_eq!(model.id, existing_id);
    }

    #[tokio::test]
    async fn ended_relationship_cannot_open_a_conversation() {
        let student_id = Uuid::new_v4();
        let therapist_id = Uuid::new_v4();

        let mut relationships = MockRelationshipRepository::new();
        relationships
            .expect_find_by_student()
            .returning(move |_| Ok(Some(relationship(student_id, None, "ended"))));

        let mut conversations = MockConversationRepository::new();
        conversations.expect_upsert_conversation().never();

        let usecase = usecase(conversations, relationships, MockParticipantRepository::new());
        let err = usecase
            .create(&caller(student_id), student_id, therapist_id)
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Conflict(ref msg) if msg == "no active relationship"));
    }

    #[tokio::test]
    async fn other_therapist_is_not_linked() {
        let student_id = Uuid::new_v4();
        let therapist_id = Uuid::new_v4();

        let mut relationships = MockRelationshipRepository::new();
        relationships.expect_find_by_student().returning(move |_| {
            Ok(Some(relationship(student_id, Some(Uuid::new_v4()), "active")))
        });

        let usecase = usecase(
            MockConversationRepository::new(),
            relationships,
            MockParticipantRepository::new(),
        );
        let err = usecase
            .create(&caller(therapist_id), student_id, therapist_id)
            .await
            .unwrap_err();

        assert_eq!(err.status_code().as_u16(), 409);
    }

    #[tokio::test]
    async fn message_goes_to_the_other_participant() {
        let student_id = Uuid::new_v4();
        let therapist_id = Uuid::new_v4();
        let existing = conversation(student_id, therapist_id);
        let conversation_id = existing.id;

        let mut conversations = MockConversationRepository::new();
        conversations
            .expect_find_conversation()
            .with(eq(conversation_id))
            .returning(move |_| Ok(Some(existing.clone())));
        conversations
            .expect_insert_message()
            .withf(move |message| {
                message.sender_id == therapist_id
                    && message.receiver_id == student_id
                    && message.content == "See you Tuesday"
            })
            .returning(|message| {
                Ok(MessageEntity {
                    id: Uuid::new_v4(),
                    conversation_id: message.conversation_id,
                    sender_id: message.sender_id,
                    receiver_id: message.receiver_id,
                    content: message.content,
                    sent_at: Utc::now(),
                    is_read: false,
                })
            });

        let usecase = usecase(
            conversations,
            MockRelationshipRepository::new(),
            MockParticipantRepository::new(),
        );
        let message = usecase
            .send_message(&caller(therapist_id), conversation_id, "See you Tuesday".to_string())
            .await
            .unwrap();

        assert_eq!(message.receiver_id, student_id);
        assert!(!message.is_read);
    }

    #[tokio::test]
    async fn outsiders_cannot_read_messages() {
        let existing = conversation(Uuid::new_v4(), Uuid::new_v4());
        let conversation_id = existing.id;

        let mut conversations = MockConversationRepository::new();
        conversations
            .expect_find_conversation()
            .returning(move |_| Ok(Some(existing.clone())));
        conversations.expect_list_messages().never();

        let usecase = usecase(
            conversations,
            MockRelationshipRepository::new(),
            MockParticipantRepository::new(),
        );
        let err = usecase
            .list_messages(&caller(Uuid::new_v4()), conversation_id)
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Forbidden(_)));
    }

    #[tokio::test]
    async fn listing_attaches_unread_counts() {
        let student_id = Uuid::new_v4();
        let first = conversation(student_id, Uuid::new_v4());
        let second = conversation(student_id, Uuid::new_v4());
        let first_id = first.id;

        let mut conversations = MockConversationRepository::new();
        conversations
            .expect_list_for_user()
            .with(eq(student_id))
            .returning(move |_| Ok(vec![first.clone(), second.clone()]));
        conversations
            .expect_count_unread()
            .with(eq(student_id))
            .returning(move |_| Ok(vec![(first_id, 3)]));

        let mut participants = MockParticipantRepository::new();
        participants
            .expect_find_names()
            .returning(|_| Ok(HashMap::new()));

        let usecase = usecase(conversations, MockRelationshipRepository::new(), participants);
        let views = usecase.list(&caller(student_id)).await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].unread_count, 3);
        assert_eq!(views[1].unread_count, 0);
    }
}
