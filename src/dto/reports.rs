use serde::Serialize;
use utoipa::ToSchema;

/// Invoice amounts summed per day, in chart-ready parallel arrays.
#[derive(Debug, Serialize, ToSchema)]
pub struct SalesReport {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BestSeller {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BestSellerList {
    pub items: Vec<BestSeller>,
}
