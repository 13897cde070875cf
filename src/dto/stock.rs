use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustStockRequest {
    pub id: Uuid,
    /// Relative change, positive or negative. Applied as a single UPDATE so
    /// concurrent adjustments to the same row never lose increments.
    pub adjustment: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub product: Option<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockList {
    pub items: Vec<StockDto>,
}
