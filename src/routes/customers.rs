use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::customers::{
        CreateCustomerRequest, CustomerList, DeleteCustomerRequest, UpdateCustomerRequest,
    },
    error::AppResult,
    models::Customer,
    response::ApiResponse,
    routes::params::SearchQuery,
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_customers)
            .post(create_customer)
            .put(update_customer)
            .delete(delete_customer),
    )
}

#[utoipa::path(
    get,
    path = "/api/customers",
    params(
        ("search" = Option<String>, Query, description = "Filter by name, case-insensitive")
    ),
    responses(
        (status = 200, description = "List customers", body = ApiResponse<CustomerList>)
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&state, query.search).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Create customer", body = ApiResponse<Customer>),
        (status = 400, description = "Name and CUIT are required"),
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Customer>>)> {
    let resp = customer_service::create_customer(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/customers",
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Update customer", body = ApiResponse<Customer>),
        (status = 400, description = "ID, Name and CUIT are required"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::update_customer(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/customers",
    request_body = DeleteCustomerRequest,
    responses(
        (status = 200, description = "Delete customer", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Json(payload): Json<DeleteCustomerRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = customer_service::delete_customer(&state, payload.id).await?;
    Ok(Json(resp))
}
