mod common;

use common::setup_state;
use facturador_api::{
    dto::auth::RegisterRequest,
    dto::users::{ChangePasswordRequest, UpdateUserRequest},
    error::AppError,
    middleware::auth::AuthUser,
    services::{auth_service, user_service},
};
use uuid::Uuid;

fn admin() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: "ADMIN".into(),
    }
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        username: Some("vendedor".into()),
        email: Some(email.to_string()),
        password: Some("secreto123".into()),
    }
}

#[tokio::test]
async fn register_rejects_missing_fields_and_duplicate_email() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let err = auth_service::register_user(
        &state.pool,
        RegisterRequest {
            username: Some("vendedor".into()),
            email: None,
            password: Some("secreto123".into()),
        },
    )
    .await
    .expect_err("missing email");
    assert!(matches!(err, AppError::BadRequest(_)));

    let email = format!("vendedor-{}@example.com", Uuid::new_v4());
    let created = auth_service::register_user(&state.pool, register_request(&email))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("registered user");
    assert_eq!(created.role, "USER");
    assert!(!created.blocked);

    let err = auth_service::register_user(&state.pool, register_request(&email))
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn user_administration_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let email = format!("cajero-{}@example.com", Uuid::new_v4());
    let user = auth_service::register_user(&state.pool, register_request(&email))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("registered user");

    // Only admins may touch user records.
    let not_admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "USER".into(),
    };
    let err = user_service::get_user(&state, &not_admin, user.id)
        .await
        .expect_err("non-admin");
    assert!(matches!(err, AppError::Forbidden));

    let fetched = user_service::get_user(&state, &admin(), user.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("user");
    assert_eq!(fetched.email, email);

    let err = user_service::update_user(
        &state,
        &admin(),
        user.id,
        UpdateUserRequest {
            username: None,
            email: None,
            role: Some("SUPERUSER".into()),
            blocked: None,
        },
    )
    .await
    .expect_err("invalid role");
    assert!(matches!(err, AppError::BadRequest(_)));

    let updated = user_service::update_user(
        &state,
        &admin(),
        user.id,
        UpdateUserRequest {
            username: Some("cajero-principal".into()),
            email: None,
            role: Some("ADMIN".into()),
            blocked: Some(true),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("updated user");
    assert_eq!(updated.username, "cajero-principal");
    assert_eq!(updated.role, "ADMIN");
    assert!(updated.blocked);

    let err = user_service::change_password(
        &state,
        &admin(),
        user.id,
        ChangePasswordRequest { new_password: None },
    )
    .await
    .expect_err("missing password");
    assert!(matches!(err, AppError::BadRequest(_)));

    user_service::change_password(
        &state,
        &admin(),
        user.id,
        ChangePasswordRequest {
            new_password: Some("nuevo-secreto".into()),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    user_service::delete_user(&state, &admin(), user.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let err = user_service::get_user(&state, &admin(), user.id)
        .await
        .expect_err("deleted user");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn email_conflict_on_update() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let email_a = format!("a-{}@example.com", Uuid::new_v4());
    let email_b = format!("b-{}@example.com", Uuid::new_v4());
    auth_service::register_user(&state.pool, register_request(&email_a))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let user_b = auth_service::register_user(&state.pool, register_request(&email_b))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("registered user");

    let err = user_service::update_user(
        &state,
        &admin(),
        user_b.id,
        UpdateUserRequest {
            username: None,
            email: Some(email_a),
            role: None,
            blocked: None,
        },
    )
    .await
    .expect_err("email already taken");
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}
