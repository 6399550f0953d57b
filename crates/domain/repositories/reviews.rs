use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::reviews::{InsertReviewEntity, ReviewEntity};

#[automock]
#[async_trait]
pub trait ReviewRepository {
    async fn create_review(&self, review: InsertReviewEntity) -> Result<ReviewEntity>;

    async fn list_for_therapist(&self, therapist_id: Uuid) -> Result<Vec<ReviewEntity>>;
}
