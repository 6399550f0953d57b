use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::value_objects::participants::ParticipantName;

/// Shared read model resolving user ids to display names.
#[automock]
#[async_trait]
pub trait ParticipantRepository {
    async fn find_names(&self, user_ids: Vec<Uuid>) -> Result<HashMap<Uuid, ParticipantName>>;
}
