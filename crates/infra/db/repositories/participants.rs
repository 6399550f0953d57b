use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::users},
};
use domain::{
    repositories::participants::ParticipantRepository,
    value_objects::participants::ParticipantName,
};

/// One lookup for every read model that shows who is involved, instead of
/// joining `users` into each query.
pub struct ParticipantPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ParticipantPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ParticipantRepository for ParticipantPostgres {
    async fn find_names(&self, mut user_ids: Vec<Uuid>) -> Result<HashMap<Uuid, ParticipantName>> {
        user_ids.sort_unstable();
        user_ids.dedup();

        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = users::table
            .filter(users::id.eq_any(user_ids))
            .select((users::id, users::first_name, users::last_name))
            .load::<(Uuid, String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(id, first_name, last_name)| {
                (
                    id,
                    ParticipantName {
                        id,
                        first_name,
                        last_name,
                    },
                )
            })
            .collect())
    }
}
