use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        therapists::{TherapistEntity, UpdateTherapistEntity},
        users::UserEntity,
    },
    value_objects::validation::{ValidationError, required},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TherapistModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub profile_picture: Option<String>,
    pub license_number: String,
    pub specialization: String,
    pub experience_years: i32,
    pub monthly_rate: i64,
    pub available: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<(TherapistEntity, UserEntity)> for TherapistModel {
    fn from((therapist, user): (TherapistEntity, UserEntity)) -> Self {
        Self {
            id: therapist.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            gender: user.gender,
            profile_picture: user.profile_picture,
            license_number: therapist.license_number,
            specialization: therapist.specialization,
            experience_years: therapist.experience_years,
            monthly_rate: therapist.monthly_rate,
            available: therapist.available,
            updated_at: therapist.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTherapistsFilter {
    pub available: Option<bool>,
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTherapistModel {
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub monthly_rate: Option<i64>,
}

impl UpdateTherapistModel {
    pub fn to_entity(&self) -> Result<UpdateTherapistEntity, ValidationError> {
        if self.experience_years.is_some_and(|years| years < 0) {
            return Err(ValidationError::Invalid(
                "experience_years must not be negative".to_string(),
            ));
        }
        if self.monthly_rate.is_some_and(|rate| rate < 0) {
            return Err(ValidationError::Invalid(
                "monthly_rate must not be negative".to_string(),
            ));
        }

        let specialization = self
            .specialization
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        if specialization.is_none() && self.experience_years.is_none() && self.monthly_rate.is_none()
        {
            return Err(ValidationError::Invalid(
                "at least one field must be provided".to_string(),
            ));
        }

        Ok(UpdateTherapistEntity {
            specialization,
            experience_years: self.experience_years,
            monthly_rate: self.monthly_rate,
            available: None,
            updated_at: Some(Utc::now()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAvailabilityModel {
    pub available: Option<bool>,
}

impl UpdateAvailabilityModel {
    pub fn validate(self) -> Result<bool, ValidationError> {
        required(self.available, "available")
    }
}
