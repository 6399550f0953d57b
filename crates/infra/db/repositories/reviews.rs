use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::reviews},
};
use domain::{
    entities::reviews::{InsertReviewEntity, ReviewEntity},
    repositories::reviews::ReviewRepository,
};

pub struct ReviewPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReviewPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReviewRepository for ReviewPostgres {
    async fn create_review(&self, review: InsertReviewEntity) -> Result<ReviewEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(reviews::table)
            .values(&review)
            .returning(ReviewEntity::as_returning())
            .get_result::<ReviewEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_for_therapist(&self, therapist_id: Uuid) -> Result<Vec<ReviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = reviews::table
            .filter(reviews::therapist_id.eq(therapist_id))
            .select(ReviewEntity::as_select())
            .order(reviews::created_at.desc())
            .load::<ReviewEntity>(&mut conn)?;

        Ok(results)
    }
}
