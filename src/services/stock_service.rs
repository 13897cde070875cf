use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::stock::{AdjustStockRequest, CreateStockRequest, StockDto, StockList},
    error::{AppError, AppResult},
    models::{Product, Stock},
    response::{ApiResponse, Meta},
};

#[derive(FromRow)]
struct StockWithProductRow {
    id: Uuid,
    product_id: Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
    name: String,
    price: f64,
    user_id: Uuid,
    product_created_at: DateTime<Utc>,
}

impl StockWithProductRow {
    fn into_dto(self) -> StockDto {
        StockDto {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
            created_at: self.created_at,
            product: Some(Product {
                id: self.product_id,
                name: self.name,
                price: self.price,
                user_id: self.user_id,
                created_at: self.product_created_at,
            }),
        }
    }
}

pub async fn list_stock(pool: &DbPool) -> AppResult<ApiResponse<StockList>> {
    let rows = sqlx::query_as::<_, StockWithProductRow>(
        r#"
        SELECT s.id, s.product_id, s.quantity, s.created_at,
               p.name, p.price, p.user_id, p.created_at AS product_created_at
        FROM stocks s
        JOIN products p ON p.id = s.product_id
        ORDER BY s.created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    let items: Vec<StockDto> = rows.into_iter().map(StockWithProductRow::into_dto).collect();
    let total = items.len() as i64;

    Ok(ApiResponse::success(
        "Stock",
        StockList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Plain insert; a product may accumulate several stock rows and nothing
/// here prevents that.
pub async fn create_stock(
    pool: &DbPool,
    payload: CreateStockRequest,
) -> AppResult<ApiResponse<Stock>> {
    let stock = sqlx::query_as::<_, Stock>(
        "INSERT INTO stocks (id, product_id, quantity) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.product_id)
    .bind(payload.quantity)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        None,
        "stock_create",
        Some("stocks"),
        Some(serde_json::json!({ "stock_id": stock.id, "product_id": stock.product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Stock created", stock, Some(Meta::empty())))
}

/// The increment runs as one UPDATE statement so two concurrent adjustments
/// to the same row both land; there is no floor, quantity may go negative.
pub async fn adjust_stock(
    pool: &DbPool,
    payload: AdjustStockRequest,
) -> AppResult<ApiResponse<StockDto>> {
    let row = sqlx::query_as::<_, StockWithProductRow>(
        r#"
        WITH updated AS (
            UPDATE stocks
            SET quantity = quantity + $2
            WHERE id = $1
            RETURNING id, product_id, quantity, created_at
        )
        SELECT u.id, u.product_id, u.quantity, u.created_at,
               p.name, p.price, p.user_id, p.created_at AS product_created_at
        FROM updated u
        JOIN products p ON p.id = u.product_id
        "#,
    )
    .bind(payload.id)
    .bind(payload.adjustment)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    if let Err(err) = log_audit(
        pool,
        None,
        "stock_adjust",
        Some("stocks"),
        Some(serde_json::json!({ "stock_id": payload.id, "adjustment": payload.adjustment })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stock adjusted",
        row.into_dto(),
        Some(Meta::empty()),
    ))
}
