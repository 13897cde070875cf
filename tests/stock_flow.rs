mod common;

use common::{create_product, create_user, setup_state};
use facturador_api::{
    dto::stock::{AdjustStockRequest, CreateStockRequest},
    error::AppError,
    services::stock_service,
};
use uuid::Uuid;

async fn quantity_of(pool: &sqlx::PgPool, stock_id: Uuid) -> anyhow::Result<i32> {
    let row: (i32,) = sqlx::query_as("SELECT quantity FROM stocks WHERE id = $1")
        .bind(stock_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[tokio::test]
async fn adjustments_round_trip() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "ADMIN").await?;
    let product_id = create_product(&state, user_id, "Yerba", 2500.0, 10).await?;

    let stock = stock_service::create_stock(
        &state.pool,
        CreateStockRequest {
            product_id,
            quantity: 10,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("created stock");

    let up = stock_service::adjust_stock(
        &state.pool,
        AdjustStockRequest {
            id: stock.id,
            adjustment: 5,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("adjusted stock");
    assert_eq!(up.quantity, 15);
    assert!(up.product.is_some(), "adjusted row comes back with product");

    let down = stock_service::adjust_stock(
        &state.pool,
        AdjustStockRequest {
            id: stock.id,
            adjustment: -5,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("adjusted stock");
    assert_eq!(down.quantity, 10, "adjust(+5) then adjust(-5) round-trips");

    Ok(())
}

// Both relative updates must land even when racing on the same row.
#[tokio::test]
async fn concurrent_adjustments_lose_nothing() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "ADMIN").await?;
    let product_id = create_product(&state, user_id, "Azucar", 900.0, 10).await?;

    let stock = stock_service::create_stock(
        &state.pool,
        CreateStockRequest {
            product_id,
            quantity: 100,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("created stock");

    let pool_a = state.pool.clone();
    let pool_b = state.pool.clone();
    let id = stock.id;

    let up = tokio::spawn(async move {
        stock_service::adjust_stock(&pool_a, AdjustStockRequest { id, adjustment: 5 }).await
    });
    let down = tokio::spawn(async move {
        stock_service::adjust_stock(&pool_b, AdjustStockRequest { id, adjustment: -5 }).await
    });

    up.await?.map_err(|e| anyhow::anyhow!(e.to_string()))?;
    down.await?.map_err(|e| anyhow::anyhow!(e.to_string()))?;

    assert_eq!(quantity_of(&state.pool, stock.id).await?, 100);

    Ok(())
}

#[tokio::test]
async fn quantity_may_go_negative_and_duplicates_are_allowed() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "ADMIN").await?;
    let product_id = create_product(&state, user_id, "Fideos", 750.0, 1).await?;

    // A second row for the same product is accepted; nothing deduplicates.
    let extra = stock_service::create_stock(
        &state.pool,
        CreateStockRequest {
            product_id,
            quantity: 0,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("duplicate stock row");

    let adjusted = stock_service::adjust_stock(
        &state.pool,
        AdjustStockRequest {
            id: extra.id,
            adjustment: -3,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("adjusted stock");
    assert_eq!(adjusted.quantity, -3, "no floor is enforced");

    Ok(())
}

#[tokio::test]
async fn adjusting_unknown_row_is_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let err = stock_service::adjust_stock(
        &state.pool,
        AdjustStockRequest {
            id: Uuid::new_v4(),
            adjustment: 1,
        },
    )
    .await
    .expect_err("unknown stock row");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}
