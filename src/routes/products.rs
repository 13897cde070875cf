use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::products::{
        CreateProductRequest, DeleteProductRequest, ProductList, UpdateProductRequest,
    },
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::params::SearchQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_products)
            .post(create_product)
            .put(update_product)
            .delete(delete_product),
    )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("search" = Option<String>, Query, description = "Filter by name, case-insensitive")
    ),
    responses(
        (status = 200, description = "List products with user and stock rows", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query.search).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product with its initial stock row", body = ApiResponse<Product>),
        (status = 400, description = "Validation failure"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products",
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Update product and its first stock row", body = ApiResponse<Product>),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Product or stock not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products",
    request_body = DeleteProductRequest,
    responses(
        (status = 200, description = "Delete product", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Json(payload): Json<DeleteProductRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_product(&state, payload.id).await?;
    Ok(Json(resp))
}
