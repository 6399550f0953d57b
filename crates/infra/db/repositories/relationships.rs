use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        constraints::unique_violation_message, postgres_connection::PgPoolSquad,
        schema::relationships,
    },
};
use domain::{
    entities::relationships::{InsertRelationshipEntity, RelationshipEntity},
    repositories::relationships::RelationshipRepository,
    value_objects::{enums::relationship_statuses::RelationshipStatus, outcomes::CreateOutcome},
};

const RELATIONSHIP_EXISTS: &str = "relationship already exists for this student";

pub struct RelationshipPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RelationshipPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RelationshipRepository for RelationshipPostgres {
    async fn find_by_student(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = relationships::table
            .filter(relationships::student_id.eq(student_id))
            .select(RelationshipEntity::as_select())
            .first::<RelationshipEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn assign(
        &self,
        student_id: Uuid,
        therapist_id: Uuid,
    ) -> Result<CreateOutcome<RelationshipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<CreateOutcome<RelationshipEntity>, diesel::result::Error, _>(
            |tx| {
                let existing = relationships::table
                    .filter(relationships::student_id.eq(student_id))
                    .select(RelationshipEntity::as_select())
                    .for_update()
                    .first::<RelationshipEntity>(tx)
                    .optional()?;

                match existing {
                    Some(row) if RelationshipStatus::from_str(&row.status).is_live() => Ok(
                        CreateOutcome::AlreadyExists(RELATIONSHIP_EXISTS.to_string()),
                    ),
                    Some(_) => {
                        let revived =
                            update(relationships::table.filter(relationships::student_id.eq(student_id)))
                                .set((
                                    relationships::current_therapist_id.eq(Some(therapist_id)),
                                    relationships::requested_therapist_id.eq(None::<Uuid>),
                                    relationships::status.eq(RelationshipStatus::Active.to_string()),
                                    relationships::updated_at.eq(Utc::now()),
                                ))
                                .returning(RelationshipEntity::as_returning())
                                .get_result::<RelationshipEntity>(tx)?;
                        Ok(CreateOutcome::Created(revived))
                    }
                    None => {
                        let created = insert_into(relationships::table)
                            .values(&InsertRelationshipEntity {
                                student_id,
                                current_therapist_id: Some(therapist_id),
                                requested_therapist_id: None,
                                status: RelationshipStatus::Active.to_string(),
                            })
                            .returning(RelationshipEntity::as_returning())
                            .get_result::<RelationshipEntity>(tx)?;
                        Ok(CreateOutcome::Created(created))
                    }
                }
            },
        );

        // A concurrent first assignment loses on the primary key.
        match result {
            Ok(outcome) => Ok(outcome),
            Err(err) => match unique_violation_message(&err) {
                Some(message) => Ok(CreateOutcome::AlreadyExists(message)),
                None => Err(err.into()),
            },
        }
    }

    async fn request_switch(
        &self,
        student_id: Uuid,
        requested_therapist_id: Uuid,
    ) -> Result<Option<RelationshipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let settled: Vec<String> = RelationshipStatus::ALL
            .iter()
            .filter(|status| status.can_request_switch())
            .map(|status| status.to_string())
            .collect();

        let result = update(
            relationships::table
                .filter(relationships::student_id.eq(student_id))
                .filter(relationships::current_therapist_id.is_not_null())
                .filter(relationships::status.eq_any(settled)),
        )
        .set((
            relationships::requested_therapist_id.eq(Some(requested_therapist_id)),
            relationships::status.eq(RelationshipStatus::Pending.to_string()),
            relationships::updated_at.eq(Utc::now()),
        ))
        .returning(RelationshipEntity::as_returning())
        .get_result::<RelationshipEntity>(&mut conn)
        .optional()?;

        Ok(result)
    }

    async fn approve_switch(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The right-hand side reads the pre-update row, so the requested id
        // is copied before it is cleared.
        let result = update(
            relationships::table
                .filter(relationships::student_id.eq(student_id))
                .filter(relationships::status.eq(RelationshipStatus::Pending.to_string()))
                .filter(relationships::requested_therapist_id.is_not_null()),
        )
        .set((
            relationships::current_therapist_id.eq(relationships::requested_therapist_id),
            relationships::requested_therapist_id.eq(None::<Uuid>),
            relationships::status.eq(RelationshipStatus::Switched.to_string()),
            relationships::updated_at.eq(Utc::now()),
        ))
        .returning(RelationshipEntity::as_returning())
        .get_result::<RelationshipEntity>(&mut conn)
        .optional()?;

        Ok(result)
    }

    async fn reject_switch(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(
            relationships::table
                .filter(relationships::student_id.eq(student_id))
                .filter(relationships::status.eq(RelationshipStatus::Pending.to_string())),
        )
        .set((
            relationships::requested_therapist_id.eq(None::<Uuid>),
            relationships::status.eq(RelationshipStatus::Active.to_string()),
            relationships::updated_at.eq(Utc::now()),
        ))
        .returning(RelationshipEntity::as_returning())
        .get_result::<RelationshipEntity>(&mut conn)
        .optional()?;

        Ok(result)
    }

    async fn end(&self, student_id: Uuid) -> Result<Option<RelationshipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(
            relationships::table
                .filter(relationships::student_id.eq(student_id))
                .filter(relationships::status.ne(RelationshipStatus::Ended.to_string())),
        )
        .set((
            relationships::current_therapist_id.eq(None::<Uuid>),
            relationships::requested_therapist_id.eq(None::<Uuid>),
            relationships::status.eq(RelationshipStatus::Ended.to_string()),
            relationships::updated_at.eq(Utc::now()),
        ))
        .returning(RelationshipEntity::as_returning())
        .get_result::<RelationshipEntity>(&mut conn)
        .optional()?;

        Ok(result)
    }

    async fn list_for_therapist(&self, therapist_id: Uuid) -> Result<Vec<RelationshipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = relationships::table
            .filter(
                relationships::current_therapist_id
                    .eq(therapist_id)
                    .or(relationships::requested_therapist_id.eq(therapist_id)),
            )
            .select(RelationshipEntity::as_select())
            .order(relationships::updated_at.desc())
            .load::<RelationshipEntity>(&mut conn)?;

        Ok(results)
    }
}
