use argon2::{
    Argon2, PasswordHasher,
    password_hash::SaltString,
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::users::{ChangePasswordRequest, UpdateUserRequest},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(admin)?;
    let user = Users::find_by_id(id).one(&state.orm).await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("User", user_from_entity(user), None))
}

pub async fn update_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(admin)?;

    if let Some(role) = payload.role.as_deref() {
        validate_role(role)?;
    }

    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    if let Some(email) = payload.email.as_ref() {
        let taken = Users::find()
            .filter(Column::Email.eq(email.clone()))
            .filter(Column::Id.ne(id))
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Email already taken".into()));
        }
    }

    let mut active: ActiveModel = existing.into();
    if let Some(username) = payload.username {
        active.username = Set(username);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    if let Some(blocked) = payload.blocked {
        active.blocked = Set(blocked);
    }
    let user = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.user_id),
        "user_update",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(admin)?;
    let result = Users::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.user_id),
        "user_delete",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn change_password(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(admin)?;

    let new_password = payload
        .new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("New password is required".into()))?;

    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(new_password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let mut active: ActiveModel = existing.into();
    active.password_hash = Set(password_hash);
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.user_id),
        "password_change",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Password updated successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_role(role: &str) -> Result<(), AppError> {
    const VALID: [&str; 2] = ["USER", "ADMIN"];
    if VALID.contains(&role) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid role".into()))
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        role: model.role,
        blocked: model.blocked,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
