use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::reviews::ReviewEntity,
    value_objects::{
        participants::ParticipantName,
        validation::{ValidationError, required, required_text},
    },
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub rating: i32,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewEntity> for ReviewModel {
    fn from(entity: ReviewEntity) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            therapist_id: entity.therapist_id,
            rating: entity.rating,
            review_text: entity.review_text,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: ReviewModel,
    pub student: Option<ParticipantName>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TherapistReviewsDto {
    pub therapist_id: Uuid,
    pub review_count: usize,
    pub average_rating: Option<f64>,
    pub reviews: Vec<ReviewView>,
}

impl TherapistReviewsDto {
    pub fn new(therapist_id: Uuid, reviews: Vec<ReviewView>) -> Self {
        let review_count = reviews.len();
        let average_rating = if review_count == 0 {
            None
        } else {
            let total: i64 = reviews.iter().map(|r| i64::from(r.review.rating)).sum();
            Some(total as f64 / review_count as f64)
        };

        Self {
            therapist_id,
            review_count,
            average_rating,
            reviews,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewModel {
    pub therapist_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub review_text: Option<String>,
}

impl CreateReviewModel {
    pub fn validate(self) -> Result<(Uuid, i32, String), ValidationError> {
        let therapist_id = required(self.therapist_id, "therapist_id")?;
        let rating = required(self.rating, "rating")?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::Invalid(format!(
                "rating must be an integer between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        let review_text = required_text(self.review_text, "review_text")?;

        Ok((therapist_id, rating, review_text))
    }
}
