//! Helpers for the tests that run against a migrated PostgreSQL database.
#![allow(dead_code)]

use std::sync::Arc;

use crates::{
    domain::{
        entities::{therapists::InsertTherapistEntity, users::InsertUserEntity},
        repositories::users::UserRepository,
        value_objects::{enums::user_roles::UserRole, outcomes::CreateOutcome},
    },
    infra::db::{
        postgres::{
            postgres_connection::{PgPoolSquad, establish_connection},
            schema::verified_licenses,
        },
        repositories::users::UserPostgres,
    },
};
use diesel::{ExpressionMethods, RunQueryDsl, insert_into};
use uuid::Uuid;

pub fn pool() -> Arc<PgPoolSquad> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    Arc::new(establish_connection(&url, 2).expect("pool"))
}

/// An address no other test run will reuse.
pub fn unique_email(prefix: &str) -> String {
    format!("{}+{}@x.com", prefix, Uuid::new_v4().simple())
}

pub fn unique_license() -> String {
    format!("L-{}", Uuid::new_v4().simple())
}

pub fn new_user(first_name: &str, role: UserRole) -> InsertUserEntity {
    InsertUserEntity {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        gender: None,
        role: role.to_string(),
    }
}

pub fn verify_license(db_pool: &PgPoolSquad, license_number: &str) {
    let mut conn = db_pool.get().expect("connection");
    insert_into(verified_licenses::table)
        .values(verified_licenses::license_number.eq(license_number))
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .expect("verified license");
}

pub async fn remove_existing(users: &UserPostgres, email: &str) {
    if let Some((user, _)) = users.find_credential_by_email(email).await.expect("lookup") {
        users.delete_user(user.id).await.expect("cleanup");
    }
}

pub async fn register_student(users: &UserPostgres, email: &str) -> Uuid {
    let outcome = users
        .register_student(
            new_user("Student", UserRole::Student),
            email.to_string(),
            "not-a-real-hash".to_string(),
        )
        .await
        .expect("register student");

    match outcome {
        CreateOutcome::Created(user) => user.id,
        CreateOutcome::AlreadyExists(reason) => panic!("student already exists: {reason}"),
    }
}

/// Registers a therapist whose license is put on the verified list first.
pub async fn register_therapist(
    db_pool: &PgPoolSquad,
    users: &UserPostgres,
    email: &str,
    license_number: &str,
) -> Uuid {
    verify_license(db_pool, license_number);

    let outcome = users
        .register_therapist(
            new_user("Therapist", UserRole::Therapist),
            email.to_string(),
            "not-a-real-hash".to_string(),
            InsertTherapistEntity {
                user_id: Uuid::nil(),
                license_number: license_number.to_string(),
                specialization: "Anxiety".to_string(),
                experience_years: 5,
                monthly_rate: 20_000,
                available: true,
            },
        )
        .await
        .expect("register therapist");

    match outcome {
        CreateOutcome::Created(user) => user.id,
        CreateOutcome::AlreadyExists(reason) => panic!("therapist already exists: {reason}"),
    }
}
