use std::sync::Arc;

use crates::domain::{
    entities::reviews::InsertReviewEntity,
    repositories::{
        participants::ParticipantRepository, reviews::ReviewRepository,
        therapists::TherapistRepository,
    },
    value_objects::{
        enums::user_roles::UserRole,
        reviews::{ReviewModel, ReviewView, TherapistReviewsDto},
    },
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    usecases::errors::{UseCaseError, UseCaseResult},
};

pub struct ReviewUseCase<V, T, P>
where
    V: ReviewRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    review_repo: Arc<V>,
    therapist_repo: Arc<T>,
    participant_repo: Arc<P>,
}

impl<V, T, P> ReviewUseCase<V, T, P>
where
    V: ReviewRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    pub fn new(review_repo: Arc<V>, therapist_repo: Arc<T>, participant_repo: Arc<P>) -> Self {
        Self {
            review_repo,
            therapist_repo,
            participant_repo,
        }
    }

    pub async fn create(
        &self,
        caller: &AuthUser,
        therapist_id: Uuid,
        rating: i32,
        review_text: String,
    ) -> UseCaseResult<ReviewModel> {
        if caller.role != UserRole::Student {
            return Err(UseCaseError::Forbidden(
                "only students can review therapists".to_string(),
            ));
        }

        let therapist = self
            .therapist_repo
            .find_therapist(therapist_id)
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "reviews: failed to load therapist");
                UseCaseError::Internal(err)
            })?;
        if therapist.is_none() {
            return Err(UseCaseError::NotFound("therapist not found".to_string()));
        }

        let review = self
            .review_repo
            .create_review(InsertReviewEntity {
                student_id: caller.user_id,
                therapist_id,
                rating,
                review_text,
            })
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "reviews: failed to create review");
                UseCaseError::Internal(err)
            })?;

        info!(%therapist_id, review_id = %review.id, rating, "reviews: review created");
        Ok(ReviewModel::from(review))
    }

    pub async fn list_for_therapist(&self, therapist_id: Uuid) -> UseCaseResult<TherapistReviewsDto> {
        let reviews = self
            .review_repo
            .list_for_therapist(therapist_id)
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "reviews: failed to list reviews");
                UseCaseError::Internal(err)
            })?;

        let names = self
            .participant_repo
            .find_names(reviews.iter().map(|r| r.student_id).collect())
            .await
            .map_err(|err| {
                error!(%therapist_id, db_error = ?err, "reviews: failed to load reviewer names");
                UseCaseError::Internal(err)
            })?;

        let views = reviews
            .into_iter()
            .map(|review| ReviewView {
                student: names.get(&review.student_id).cloned(),
                review: ReviewModel::from(review),
            })
            .collect();

        Ok(TherapistReviewsDto::new(therapist_id, views))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crates::domain::{
        entities::reviews::ReviewEntity,
        repositories::{
            participants::MockParticipantRepository, reviews::MockReviewRepository,
            therapists::MockTherapistRepository,
        },
    };
    use mockall::predicate::eq;
    use std::collections::HashMap;

    fn review(therapist_id: Uuid, rating: i32) -> ReviewEntity {
        let now = Utc::now();
        ReviewEntity {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            therapist_id,
            rating,
            review_text: "Helpful sessions".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn lists_reviews_with_average() {
        let therapist_id = Uuid::new_v4();
        let rows = vec![review(therapist_id, 5), review(therapist_id, 4)];

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_list_for_therapist()
            .with(eq(therapist_id))
            .returning(move |_| Ok(rows.clone()));

        let mut participants = MockParticipantRepository::new();
        participants
            .expect_find_names()
            .withf(|ids| ids.len() == 2)
            .returning(|_| Ok(HashMap::new()));

        let usecase = ReviewUseCase::new(
            Arc::new(reviews),
            Arc::new(MockTherapistRepository::new()),
            Arc::new(participants),
        );
        let dto = usecase.list_for_therapist(therapist_id).await.unwrap();

        assert_eq!(dto.review_count, 2);
        assert_eq!(dto.average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn review_of_unknown_therapist_is_not_found() {
        let mut therapists = MockTherapistRepository::new();
        therapists.expect_find_therapist().returning(|_| Ok(None));

        let mut reviews = MockReviewRepository::new();
        reviews.expect_create_review().never();

        let usecase = ReviewUseCase::new(
            Arc::new(reviews),
            Arc::new(therapists),
            Arc::new(MockParticipantRepository::new()),
        );
        let caller = AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role: UserRole::Student,
        };
        let err = usecase
            .create(&caller, Uuid::new_v4(), 5, "Great".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::NotFound(_)));
    }
}
