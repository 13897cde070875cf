use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, Stock, User};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub user_id: Option<Uuid>,
    /// Initial quantity for the stock row created alongside the product.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteProductRequest {
    pub id: Uuid,
}

/// Product with its owning user and stock rows expanded, matching what the
/// listing screens consume.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub user: Option<User>,
    pub stocks: Vec<Stock>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<ProductDetail>,
}
