//! Runs against a migrated PostgreSQL database:
//! `DATABASE_URL=... cargo test -p crates -- --ignored`

mod common;

use std::sync::Arc;

use crates::{
    domain::{
        repositories::{
            relationships::RelationshipRepository, therapists::TherapistRepository,
        },
        value_objects::{enums::relationship_statuses::RelationshipStatus, outcomes::CreateOutcome},
    },
    infra::db::repositories::{
        relationships::RelationshipPostgres, therapists::TherapistPostgres, users::UserPostgres,
    },
};

const STUDENT_EMAIL: &str = "a@x.com";
const FIRST_THERAPIST_EMAIL: &str = "t1@x.com";
const SECOND_THERAPIST_EMAIL: &str = "t2@x.com";
const FIRST_LICENSE: &str = "L123";
const SECOND_LICENSE: &str = "L456";

#[tokio::test]
#[ignore]
async fn student_switches_therapist_and_both_parties_agree() {
    let db_pool = common::pool();
    let users = UserPostgres::new(Arc::clone(&db_pool));
    let therapists = TherapistPostgres::new(Arc::clone(&db_pool));
    let relationships = RelationshipPostgres::new(Arc::clone(&db_pool));

    for email in [STUDENT_EMAIL, FIRST_THERAPIST_EMAIL, SECOND_THERAPIST_EMAIL] {
        common::remove_existing(&users, email).await;
    }

    let student_id = common::register_student(&users, STUDENT_EMAIL).await;
    let first_id =
        common::register_therapist(&db_pool, &users, FIRST_THERAPIST_EMAIL, FIRST_LICENSE).await;
    let second_id =
        common::register_therapist(&db_pool, &users, SECOND_THERAPIST_EMAIL, SECOND_LICENSE)
            .await;
    assert!(
        therapists
            .find_verified_license(FIRST_LICENSE)
            .await
            .expect("license lookup")
            .is_some()
    );

    let assigned = relationships
        .assign(student_id, first_id)
        .await
        .expect("assign")
        .into_created()
        .expect("relationship created");
    assert_eq!(assigned.status, RelationshipStatus::Active.to_string());

    let duplicate = relationships
        .assign(student_id, second_id)
        .await
        .expect("second assign");
    assert!(matches!(duplicate, CreateOutcome::AlreadyExists(_)));

    let pending = relationships
        .request_switch(student_id, second_id)
        .await
        .expect("request switch")
        .expect("switch accepted");
    assert_eq!(pending.status, RelationshipStatus::Pending.to_string());
    assert_eq!(pending.requested_therapist_id, Some(second_id));

    let requested_again = relationships
        .request_switch(student_id, first_id)
        .await
        .expect("repeat request");
    assert!(requested_again.is_none());

    let switched = relationships
        .approve_switch(student_id)
        .await
        .expect("approve switch")
        .expect("switch approved");
    assert_eq!(switched.status, RelationshipStatus::Switched.to_string());
    assert_eq!(switched.current_therapist_id, Some(second_id));
    assert_eq!(switched.requested_therapist_id, None);

    let seen_by_student = relationships
        .find_by_student(student_id)
        .await
        .expect("student view")
        .expect("row exists");
    let seen_by_therapist = relationships
        .list_for_therapist(second_id)
        .await
        .expect("therapist view")
        .into_iter()
        .find(|row| row.student_id == student_id)
        .expect("therapist sees the student");

    assert_eq!(seen_by_student.status, seen_by_therapist.status);
    assert_eq!(
        seen_by_student.current_therapist_id,
        seen_by_therapist.current_therapist_id
    );

    let approved_twice = relationships
        .approve_switch(student_id)
        .await
        .expect("second approve");
    assert!(approved_twice.is_none());

    for email in [STUDENT_EMAIL, FIRST_THERAPIST_EMAIL, SECOND_THERAPIST_EMAIL] {
        common::remove_existing(&users, email).await;
    }
}
