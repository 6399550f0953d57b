use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::appointments::{AppointmentEntity, InsertAppointmentEntity, UpdateAppointmentEntity},
    value_objects::{
        enums::appointment_statuses::AppointmentStatus,
        validation::{ValidationError, required},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AppointmentEntity> for AppointmentModel {
    fn from(entity: AppointmentEntity) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            therapist_id: entity.therapist_id,
            appointment_date: entity.appointment_date,
            status: AppointmentStatus::from_str(&entity.status)
                .unwrap_or(AppointmentStatus::Pending),
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

pub fn parse_status(raw: &str) -> Result<AppointmentStatus, ValidationError> {
    AppointmentStatus::from_str(raw).ok_or_else(|| {
        ValidationError::Invalid(format!(
            "status must be one of: {}",
            AppointmentStatus::ALLOWED.join(", ")
        ))
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentModel {
    pub student_id: Option<Uuid>,
    pub therapist_id: Option<Uuid>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl CreateAppointmentModel {
    /// Status defaults to `pending` when omitted.
    pub fn validate(self) -> Result<InsertAppointmentEntity, ValidationError> {
        let status = match self.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => AppointmentStatus::Pending,
        };

        Ok(InsertAppointmentEntity {
            student_id: required(self.student_id, "student_id")?,
            therapist_id: required(self.therapist_id, "therapist_id")?,
            appointment_date: required(self.appointment_date, "appointment_date")?,
            status: status.to_string(),
            notes: self.notes,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentStatusModel {
    pub status: Option<String>,
}

impl UpdateAppointmentStatusModel {
    pub fn validate(self) -> Result<AppointmentStatus, ValidationError> {
        parse_status(&required(self.status, "status")?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentModel {
    pub appointment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl UpdateAppointmentModel {
    pub fn to_entity(&self) -> Result<UpdateAppointmentEntity, ValidationError> {
        if self.appointment_date.is_none() && self.notes.is_none() {
            return Err(ValidationError::Invalid(
                "appointment_date or notes must be provided".to_string(),
            ));
        }

        Ok(UpdateAppointmentEntity {
            appointment_date: self.appointment_date,
            status: None,
            notes: self.notes.clone(),
            updated_at: Some(Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_rejected_on_create() {
        let model = CreateAppointmentModel {
            student_id: Some(Uuid::new_v4()),
            therapist_id: Some(Uuid::new_v4()),
            appointment_date: Some(Utc::now()),
            status: Some("rescheduled".to_string()),
            notes: None,
        };

        let err = model.validate().unwrap_err();
        assert!(err.to_string().starts_with("status must be one of"));
    }

    #[test]
    fn missing_date_is_reported() {
        let model = CreateAppointmentModel {
            student_id: Some(Uuid::new_v4()),
            therapist_id: Some(Uuid::new_v4()),
            appointment_date: None,
            status: None,
            notes: None,
        };

        assert_eq!(
            model.validate().unwrap_err(),
            ValidationError::Missing("appointment_date")
        );
    }

    #[test]
    fn status_update_requires_a_value() {
        let model = UpdateAppointmentStatusModel { status: None };
        assert_eq!(model.validate().unwrap_err(), ValidationError::Missing("status"));
    }
}
