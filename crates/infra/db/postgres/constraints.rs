use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Maps a unique-key violation to a client-facing conflict message.
pub fn unique_violation_message(err: &DieselError) -> Option<String> {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let message = match info.constraint_name() {
                Some("auth_credentials_email_key") => "email is already registered",
                Some("therapists_license_number_key") => "license number is already registered",
                Some("relationships_pkey") => "relationship already exists for this student",
                Some("conversations_student_id_therapist_id_key") => "conversation already exists",
                _ => "resource already exists",
            };
            Some(message.to_string())
        }
        _ => None,
    }
}
