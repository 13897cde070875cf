use crate::{
    db::DbPool,
    dto::reports::{BestSeller, BestSellerList, SalesReport},
    error::AppResult,
    response::{ApiResponse, Meta},
};

/// Invoice amounts summed per calendar day, oldest day first.
pub async fn sales(pool: &DbPool) -> AppResult<ApiResponse<SalesReport>> {
    let rows: Vec<(String, f64)> = sqlx::query_as(
        r#"
        SELECT to_char(created_at, 'DD/MM/YYYY') AS day, SUM(amount) AS total
        FROM invoices
        GROUP BY 1
        ORDER BY MIN(created_at)
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut labels = Vec::with_capacity(rows.len());
    let mut data = Vec::with_capacity(rows.len());
    for (day, total) in rows {
        labels.push(day);
        data.push(total);
    }

    Ok(ApiResponse::success(
        "Sales",
        SalesReport { labels, data },
        Some(Meta::empty()),
    ))
}

/// Top ten products by number of invoice line references.
pub async fn best_sellers(pool: &DbPool) -> AppResult<ApiResponse<BestSellerList>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT p.name, COUNT(ip.id) AS count
        FROM products p
        LEFT JOIN invoice_products ip ON ip.product_id = p.id
        GROUP BY p.id, p.name
        ORDER BY count DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|(name, count)| BestSeller { name, count })
        .collect();

    Ok(ApiResponse::success(
        "Best selling products",
        BestSellerList { items },
        Some(Meta::empty()),
    ))
}
