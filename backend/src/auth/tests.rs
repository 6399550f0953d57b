use super::*;
use axum::http::{Request, request::Builder};

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn user_secret() -> UserSecret {
    UserSecret {
        secret: SECRET.to_string(),
        ttl_minutes: 60,
    }
}

fn request() -> Builder {
    Request::builder().extension(Arc::new(user_secret()))
}

#[test]
fn test_issue_and_validate_round_trip() {
    let user_id = Uuid::new_v4();
    let issued = issue_token(&user_secret(), user_id, UserRole::Therapist, "t@x.com").unwrap();

    assert_eq!(issued.expires_in, 3600);

    let claims = validate_user_jwt(&issued.token, SECRET).expect("Valid token should pass");
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "therapist");
    assert_eq!(claims.email, "t@x.com");
}

#[test]
fn test_validate_user_jwt_expired() {
    let claims = UserClaims {
        sub: Uuid::new_v4().to_string(),
        role: "student".to_string(),
        email: "a@x.com".to_string(),
        exp: 1,
        iat: 0,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(validate_user_jwt(&token, SECRET).is_err());
}

#[test]
fn test_validate_user_jwt_invalid_signature() {
    let issued = issue_token(
        &UserSecret {
            secret: "wrongsecret".to_string(),
            ttl_minutes: 60,
        },
        Uuid::new_v4(),
        UserRole::Student,
        "a@x.com",
    )
    .unwrap();

    assert!(validate_user_jwt(&issued.token, SECRET).is_err());
}

#[tokio::test]
async fn test_extractor_reads_bearer_token() {
    let user_id = Uuid::new_v4();
    let issued = issue_token(&user_secret(), user_id, UserRole::Student, "a@x.com").unwrap();

    let (mut parts, _) = request()
        .header(AUTHORIZATION, format!("Bearer {}", issued.token))
        .body(())
        .unwrap()
        .into_parts();

    let auth = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(auth.user_id, user_id);
    assert_eq!(auth.role, UserRole::Student);
    assert!(!auth.is_therapist());
}

#[tokio::test]
async fn test_extractor_rejects_missing_header() {
    let (mut parts, _) = request().body(()).unwrap().into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &()).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn test_extractor_rejects_non_bearer_scheme() {
    let (mut parts, _) = request()
        .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(())
        .unwrap()
        .into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &()).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn test_extractor_without_secret_extension_is_internal() {
    let issued = issue_token(&user_secret(), Uuid::new_v4(), UserRole::Student, "a@x.com").unwrap();
    let (mut parts, _) = Request::builder()
        .header(AUTHORIZATION, format!("Bearer {}", issued.token))
        .body(())
        .unwrap()
        .into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &()).await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn test_extractor_uses_installed_secret_not_environment() {
    let other = UserSecret {
        secret: "anothersecretthatisnotinenv".to_string(),
        ttl_minutes: 60,
    };
    let user_id = Uuid::new_v4();
    let issued = issue_token(&other, user_id, UserRole::Therapist, "t@x.com").unwrap();

    let (mut parts, _) = Request::builder()
        .extension(Arc::new(other))
        .header(AUTHORIZATION, format!("Bearer {}", issued.token))
        .body(())
        .unwrap()
        .into_parts();

    let auth = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(auth.user_id, user_id);
    assert!(auth.is_therapist());
}
