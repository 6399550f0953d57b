use std::sync::Arc;

use crates::domain::{
    entities::{therapists::InsertTherapistEntity, users::UpdateUserEntity},
    repositories::{therapists::TherapistRepository, users::UserRepository},
    value_objects::{
        outcomes::CreateOutcome,
        users::{AuthTokenDto, Registration, TherapistRegistration, UserModel},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{self, passwords},
    config::config_model::UserSecret,
    usecases::errors::{UseCaseError, UseCaseResult},
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

pub struct UserUseCase<U, T>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    therapist_repo: Arc<T>,
    user_secret: Arc<UserSecret>,
}

impl<U, T> UserUseCase<U, T>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, therapist_repo: Arc<T>, user_secret: Arc<UserSecret>) -> Self {
        Self {
            user_repo,
            therapist_repo,
            user_secret,
        }
    }

    pub async fn register_student(&self, registration: Registration) -> UseCaseResult<AuthTokenDto> {
        info!(email = %registration.email, "users: registering student");

        let password_hash = passwords::hash_password(&registration.password)?;
        let outcome = self
            .user_repo
            .register_student(registration.user, registration.email.clone(), password_hash)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to register student");
                UseCaseError::Internal(err)
            })?;

        let user = match outcome {
            CreateOutcome::Created(user) => user,
            CreateOutcome::AlreadyExists(message) => {
                warn!(email = %registration.email, "users: student registration conflict");
                return Err(UseCaseError::Conflict(message));
            }
        };

        info!(user_id = %user.id, "users: student registered");
        self.token_for(UserModel::from_entity(user, registration.email))
    }

    pub async fn register_therapist(
        &self,
        registration: TherapistRegistration,
    ) -> UseCaseResult<AuthTokenDto> {
        let TherapistRegistration {
            registration,
            license_number,
            specialization,
            experience_years,
            monthly_rate,
        } = registration;

        info!(
            email = %registration.email,
            license_number = %license_number,
            "users: registering therapist"
        );

        let license = self
            .therapist_repo
            .find_verified_license(&license_number)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to look up license");
                UseCaseError::Internal(err)
            })?;

        if license.is_none() {
            warn!(license_number = %license_number, "users: license is not verified");
            return Err(UseCaseError::Validation(
                "license number is not verified".to_string(),
            ));
        }

        let password_hash = passwords::hash_password(&registration.password)?;
        let therapist = InsertTherapistEntity {
            user_id: Uuid::nil(),
            license_number,
            specialization,
            experience_years,
            monthly_rate,
            available: true,
        };

        let outcome = self
            .user_repo
            .register_therapist(
                registration.user,
                registration.email.clone(),
                password_hash,
                therapist,
            )
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to register therapist");
                UseCaseError::Internal(err)
            })?;

        let user = match outcome {
            CreateOutcome::Created(user) => user,
            CreateOutcome::AlreadyExists(message) => {
                warn!(email = %registration.email, %message, "users: therapist registration conflict");
                return Err(UseCaseError::Conflict(message));
            }
        };

        info!(user_id = %user.id, "users: therapist registered");
        self.token_for(UserModel::from_entity(user, registration.email))
    }

    pub async fn login(&self, email: String, password: String) -> UseCaseResult<AuthTokenDto> {
        let found = self
            .user_repo
            .find_credential_by_email(&email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to load credential");
                UseCaseError::Internal(err)
            })?;

        let Some((user, credential)) = found else {
            warn!(%email, "users: login for unknown email");
            return Err(UseCaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !passwords::verify_password(&password, &credential.password_hash)? {
            warn!(user_id = %user.id, "users: login with wrong password");
            return Err(UseCaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!(user_id = %user.id, "users: login succeeded");
        self.token_for(UserModel::from_entity(user, credential.email))
    }

    pub async fn get_profile(&self, user_id: Uuid) -> UseCaseResult<UserModel> {
        let found = self
            .user_repo
            .find_user_with_email(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load profile");
                UseCaseError::Internal(err)
            })?;

        found
            .map(|(user, email)| UserModel::from_entity(user, email))
            .ok_or_else(|| UseCaseError::NotFound("user not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateUserEntity,
    ) -> UseCaseResult<UserModel> {
        info!(%user_id, "users: updating account settings");

        let updated = self
            .user_repo
            .update_user(user_id, changes)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to update account settings");
                UseCaseError::Internal(err)
            })?;

        if updated.is_none() {
            return Err(UseCaseError::NotFound("user not found".to_string()));
        }

        self.get_profile(user_id).await
    }

    pub async fn delete_account(&self, user_id: Uuid) -> UseCaseResult<()> {
        info!(%user_id, "users: deleting account");

        let deleted = self.user_repo.delete_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "users: failed to delete account");
            UseCaseError::Internal(err)
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("user not found".to_string()));
        }

        Ok(())
    }

    fn token_for(&self, user: UserModel) -> UseCaseResult<AuthTokenDto> {
        let role = user.role;
        let issued = auth::issue_token(&self.user_secret, user.id, role, &user.email)?;

        Ok(AuthTokenDto {
            token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crates::domain::{
        entities::{
            auth_credentials::AuthCredentialEntity, users::InsertUserEntity, users::UserEntity,
            verified_licenses::VerifiedLicenseEntity,
        },
        repositories::{therapists::MockTherapistRepository, users::MockUserRepository},
        value_objects::enums::user_roles::UserRole,
    };
    use mockall::predicate::eq;

    fn secret() -> Arc<UserSecret> {
        Arc::new(UserSecret {
            secret: "unit-test-secret".to_string(),
            ttl_minutes: 30,
        })
    }

    fn sample_user(role: UserRole) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gender: None,
            role: role.to_string(),
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn registration(role: UserRole) -> Registration {
        Registration {
            email: "a@x.com".to_string(),
            password: "correct horse".to_string(),
            user: InsertUserEntity {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                gender: None,
                role: role.to_string(),
            },
        }
    }

    fn therapist_registration() -> TherapistRegistration {
        let mut base = registration(UserRole::Therapist);
        base.email = "t@x.com".to_string();
        TherapistRegistration {
            registration: base,
            license_number: "L123".to_string(),
            specialization: "CBT".to_string(),
            experience_years: 8,
            monthly_rate: 40_000,
        }
    }

    #[tokio::test]
    async fn registering_a_student_returns_a_token() {
        let mut user_repo = MockUserRepository::new();
        let user = sample_user(UserRole::Student);
        let user_id = user.id;

        user_repo
            .expect_register_student()
            .withf(|_, email, hash| email == "a@x.com" && hash.starts_with("$argon2"))
            .returning(move |_, _, _| Ok(CreateOutcome::Created(user.clone())));

        let usecase = UserUseCase::new(
            Arc::new(user_repo),
            Arc::new(MockTherapistRepository::new()),
            secret(),
        );

        let dto = usecase
            .register_student(registration(UserRole::Student))
            .await
            .unwrap();

        assert_eq!(dto.user.id, user_id);
        assert_eq!(dto.user.email, "a@x.com");
        assert_eq!(dto.token_type, "Bearer");
        assert_eq!(dto.expires_in, 30 * 60);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_register_student().returning(|_, _, _| {
            Ok(CreateOutcome::AlreadyExists(
                "email is already registered".to_string(),
            ))
        });

        let usecase = UserUseCase::new(
            Arc::new(user_repo),
            Arc::new(MockTherapistRepository::new()),
            secret(),
        );

        let err = usecase
            .register_student(registration(UserRole::Student))
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Conflict(ref msg) if msg == "email is already registered"));
    }

    #[tokio::test]
    async fn unverified_license_is_rejected_before_insert() {
        let mut therapist_repo = MockTherapistRepository::new();
        therapist_repo
            .expect_find_verified_license()
            .withf(|license| license.to_string() == "L123")
            .returning(|_| Ok(None));

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_register_therapist().never();

        let usecase = UserUseCase::new(Arc::new(user_repo), Arc::new(therapist_repo), secret());

        let err = usecase
            .register_therapist(therapist_registration())
            .await
            .unwrap_err();

        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn verified_license_registers_the_therapist() {
        let mut therapist_repo = MockTherapistRepository::new();
        therapist_repo.expect_find_verified_license().returning(|license| {
            Ok(Some(VerifiedLicenseEntity {
                license_number: license.to_string(),
                holder_name: None,
                created_at: Utc::now(),
            }))
        });

        let user = sample_user(UserRole::Therapist);
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_register_therapist()
            .withf(|_, email, _, therapist| {
                email == "t@x.com" && therapist.license_number == "L123" && therapist.available
            })
            .returning(move |_, _, _, _| Ok(CreateOutcome::Created(user.clone())));

        let usecase = UserUseCase::new(Arc::new(user_repo), Arc::new(therapist_repo), secret());

        let dto = usecase
            .register_therapist(therapist_registration())
            .await
            .unwrap();

        assert_eq!(dto.user.role, UserRole::Therapist);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let user = sample_user(UserRole::Student);
        let hash = passwords::hash_password("correct horse").unwrap();
        let credential = AuthCredentialEntity {
            user_id: user.id,
            email: "a@x.com".to_string(),
            password_hash: hash,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_credential_by_email()
            .withf(|email| email.to_string() == "a@x.com")
            .returning(move |_| Ok(Some((user.clone(), credential.clone()))));

        let usecase = UserUseCase::new(
            Arc::new(user_repo),
            Arc::new(MockTherapistRepository::new()),
            secret(),
        );

        let err = usecase
            .login("a@x.com".to_string(), "battery staple".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Unauthorized(_)));

        let ok = usecase
            .login("a@x.com".to_string(), "correct horse".to_string())
            .await
            .unwrap();
        assert_eq!(ok.user.email, "a@x.com");
    }

    #[tokio::test]
    async fn deleting_a_missing_account_is_not_found() {
        let user_id = Uuid::new_v4();
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_delete_user()
            .with(eq(user_id))
            .returning(|_| Ok(false));

        let usecase = UserUseCase::new(
            Arc::new(user_repo),
            Arc::new(MockTherapistRepository::new()),
            secret(),
        );

        let err = usecase.delete_account(user_id).await.unwrap_err();
        assert!(matches!(err, UseCaseError::NotFound(_)));
    }
}
