use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    value_objects::{
        enums::user_roles::UserRole,
        validation::{ValidationError, required, required_text},
    },
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub role: UserRole,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserModel {
    pub fn from_entity(entity: UserEntity, email: String) -> Self {
        Self {
            id: entity.id,
            email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            gender: entity.gender,
            role: UserRole::from_str(&entity.role).unwrap_or(UserRole::Student),
            profile_picture: entity.profile_picture,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Fields shared by both registration forms, checked before hashing.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub user: InsertUserEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterStudentModel {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
}

impl RegisterStudentModel {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        registration(
            self.email,
            self.password,
            self.first_name,
            self.last_name,
            self.gender,
            UserRole::Student,
        )
    }
}

#[derive(Debug, Clone)]
pub struct TherapistRegistration {
    pub registration: Registration,
    pub license_number: String,
    pub specialization: String,
    pub experience_years: i32,
    pub monthly_rate: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterTherapistModel {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub monthly_rate: Option<i64>,
}

impl RegisterTherapistModel {
    pub fn validate(self) -> Result<TherapistRegistration, ValidationError> {
        let license_number = required_text(self.license_number, "license_number")?;
        let specialization = required_text(self.specialization, "specialization")?;
        let experience_years = required(self.experience_years, "experience_years")?;
        let monthly_rate = required(self.monthly_rate, "monthly_rate")?;

        if experience_years < 0 {
            return Err(ValidationError::Invalid(
                "experience_years must not be negative".to_string(),
            ));
        }
        if monthly_rate < 0 {
            return Err(ValidationError::Invalid(
                "monthly_rate must not be negative".to_string(),
            ));
        }

        let registration = registration(
            self.email,
            self.password,
            self.first_name,
            self.last_name,
            self.gender,
            UserRole::Therapist,
        )?;

        Ok(TherapistRegistration {
            registration,
            license_number,
            specialization,
            experience_years,
            monthly_rate,
        })
    }
}

fn registration(
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    role: UserRole,
) -> Result<Registration, ValidationError> {
    let email = normalize_email(&required_text(email, "email")?)?;
    let password = required(password, "password")?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::Invalid(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(Registration {
        email,
        password,
        user: InsertUserEntity {
            first_name: required_text(first_name, "first_name")?,
            last_name: required_text(last_name, "last_name")?,
            gender: gender.filter(|g| !g.trim().is_empty()),
            role: role.to_string(),
        },
    })
}

pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_ascii_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ValidationError::Invalid("email is invalid".to_string())),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginModel {
    pub fn validate(self) -> Result<(String, String), ValidationError> {
        let email = normalize_email(&required_text(self.email, "email")?)?;
        let password = required(self.password, "password")?;
        Ok((email, password))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokenDto {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserModel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserModel {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub profile_picture: Option<String>,
}

impl UpdateUserModel {
    pub fn to_entity(&self) -> Result<UpdateUserEntity, ValidationError> {
        let entity = UpdateUserEntity {
            first_name: non_blank(&self.first_name),
            last_name: non_blank(&self.last_name),
            gender: non_blank(&self.gender),
            profile_picture: non_blank(&self.profile_picture),
            updated_at: Some(Utc::now()),
        };

        if entity.first_name.is_none()
            && entity.last_name.is_none()
            && entity.gender.is_none()
            && entity.profile_picture.is_none()
        {
            return Err(ValidationError::Invalid(
                "at least one field must be provided".to_string(),
            ));
        }

        Ok(entity)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_form() -> RegisterStudentModel {
        RegisterStudentModel {
            email: Some(" A@X.com ".to_string()),
            password: Some("correct horse".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            gender: None,
        }
    }

    #[test]
    fn student_registration_lowercases_email() {
        let registration = student_form().validate().unwrap();
        assert_eq!(registration.email, "a@x.com");
        assert_eq!(registration.user.role, "student");
    }

    #[test]
    fn short_password_is_rejected() {
        let mut form = student_form();
        form.password = Some("short".to_string());
        assert!(matches!(form.validate(), Err(ValidationError::Invalid(_))));
    }

    #[test]
    fn therapist_registration_requires_license() {
        let form = RegisterTherapistModel {
            email: Some("t@x.com".to_string()),
            password: Some("correct horse".to_string()),
            first_name: Some("Carl".to_string()),
            last_name: Some("Rogers".to_string()),
            gender: None,
            license_number: None,
            specialization: Some("CBT".to_string()),
            experience_years: Some(12),
            monthly_rate: Some(40_000),
        };

        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::Missing("license_number")
        );
    }

    #[test]
    fn empty_settings_update_is_rejected() {
        let update = UpdateUserModel {
            first_name: Some("  ".to_string()),
            last_name: None,
            gender: None,
            profile_picture: None,
        };
        assert!(update.to_entity().is_err());
    }
}
