use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
    entity::customers::{ActiveModel, Column, Entity as Customers, Model as CustomerModel},
    error::{AppError, AppResult},
    models::Customer,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    search: Option<String>,
) -> AppResult<ApiResponse<CustomerList>> {
    let mut condition = Condition::all();
    if let Some(search) = search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(Column::Name).ilike(pattern));
    }

    let items: Vec<Customer> = Customers::find()
        .filter(condition)
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(customer_from_entity)
        .collect();

    let total = items.len() as i64;
    let data = CustomerList { items };
    Ok(ApiResponse::success(
        "Customers",
        data,
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let (Some(name), Some(cuit)) = (
        payload.name.filter(|s| !s.is_empty()),
        payload.cuit.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest("Name and CUIT are required".into()));
    };

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        cuit: Set(cuit),
        created_at: NotSet,
    };
    let customer = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "customer_create",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": customer.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Customer created",
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

pub async fn update_customer(
    state: &AppState,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let (Some(id), Some(name), Some(cuit)) = (
        payload.id,
        payload.name.filter(|s| !s.is_empty()),
        payload.cuit.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest("ID, Name and CUIT are required".into()));
    };

    let existing = Customers::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.name = Set(name);
    active.cuit = Set(cuit);
    if payload.email.is_some() {
        active.email = Set(payload.email);
    }
    if payload.phone.is_some() {
        active.phone = Set(payload.phone);
    }
    let customer = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "customer_update",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": customer.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

pub async fn delete_customer(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Customers::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "customer_delete",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        cuit: model.cuit,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
