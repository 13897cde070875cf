use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::stock::{AdjustStockRequest, CreateStockRequest, StockDto, StockList},
    error::AppResult,
    models::Stock,
    response::ApiResponse,
    services::stock_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_stock).post(create_stock).patch(adjust_stock),
    )
}

#[utoipa::path(
    get,
    path = "/api/stock",
    responses(
        (status = 200, description = "List stock rows with product", body = ApiResponse<StockList>)
    ),
    tag = "Stock"
)]
pub async fn list_stock(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StockList>>> {
    let resp = stock_service::list_stock(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stock",
    request_body = CreateStockRequest,
    responses(
        (status = 201, description = "Create stock row", body = ApiResponse<Stock>)
    ),
    tag = "Stock"
)]
pub async fn create_stock(
    State(state): State<AppState>,
    Json(payload): Json<CreateStockRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Stock>>)> {
    let resp = stock_service::create_stock(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/stock",
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Adjust stock quantity by a relative amount", body = ApiResponse<StockDto>),
        (status = 404, description = "Stock row not found"),
    ),
    tag = "Stock"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Json(payload): Json<AdjustStockRequest>,
) -> AppResult<Json<ApiResponse<StockDto>>> {
    let resp = stock_service::adjust_stock(&state.pool, payload).await?;
    Ok(Json(resp))
}
