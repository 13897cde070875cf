use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::reports::{BestSellerList, SalesReport},
    error::AppResult,
    response::ApiResponse,
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(sales))
        .route("/best-selling-products", get(best_sellers))
}

#[utoipa::path(
    get,
    path = "/api/reports/sales",
    responses(
        (status = 200, description = "Invoice amounts grouped by day", body = ApiResponse<SalesReport>)
    ),
    tag = "Reports"
)]
pub async fn sales(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SalesReport>>> {
    let resp = report_service::sales(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/best-selling-products",
    responses(
        (status = 200, description = "Top products by invoice references", body = ApiResponse<BestSellerList>)
    ),
    tag = "Reports"
)]
pub async fn best_sellers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BestSellerList>>> {
    let resp = report_service::best_sellers(&state.pool).await?;
    Ok(Json(resp))
}
