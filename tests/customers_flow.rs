mod common;

use common::setup_state;
use facturador_api::{
    dto::customers::{CreateCustomerRequest, UpdateCustomerRequest},
    error::AppError,
    services::customer_service,
};
use uuid::Uuid;

#[tokio::test]
async fn customer_without_cuit_is_rejected_and_not_persisted() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let marker = format!("Sin Cuit {}", Uuid::new_v4());
    let err = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            name: Some(marker.clone()),
            email: None,
            phone: None,
            cuit: None,
        },
    )
    .await
    .expect_err("missing cuit");
    assert!(matches!(err, AppError::BadRequest(_)));

    let persisted: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers WHERE name = $1")
        .bind(&marker)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(persisted.0, 0);

    Ok(())
}

#[tokio::test]
async fn customer_crud_and_search() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let marker = format!("Almacen {}", Uuid::new_v4());
    let created = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            name: Some(marker.clone()),
            email: Some("almacen@example.com".into()),
            phone: Some("11-4444-5555".into()),
            cuit: Some("30-11111111-1".into()),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("created customer");

    // Case-insensitive substring search finds it.
    let found = customer_service::list_customers(&state, Some(marker.to_uppercase()))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("customer list");
    assert!(found.items.iter().any(|c| c.id == created.id));

    // Update requires id, name and cuit together.
    let err = customer_service::update_customer(
        &state,
        UpdateCustomerRequest {
            id: Some(created.id),
            name: Some("Renamed".into()),
            email: None,
            phone: None,
            cuit: None,
        },
    )
    .await
    .expect_err("missing cuit on update");
    assert!(matches!(err, AppError::BadRequest(_)));

    let updated = customer_service::update_customer(
        &state,
        UpdateCustomerRequest {
            id: Some(created.id),
            name: Some(format!("{marker} SRL")),
            email: None,
            phone: None,
            cuit: Some("30-11111111-1".into()),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("updated customer");
    assert_eq!(updated.name, format!("{marker} SRL"));
    assert_eq!(
        updated.email.as_deref(),
        Some("almacen@example.com"),
        "omitted fields stay untouched"
    );

    customer_service::delete_customer(&state, created.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let err = customer_service::delete_customer(&state, created.id)
        .await
        .expect_err("second delete");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

// Two customers may share a cuit; nothing enforces uniqueness.
#[tokio::test]
async fn duplicate_cuit_is_accepted() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let cuit = format!("duplicated-{}", Uuid::new_v4());
    for name in ["Primero", "Segundo"] {
        customer_service::create_customer(
            &state,
            CreateCustomerRequest {
                name: Some(name.into()),
                email: None,
                phone: None,
                cuit: Some(cuit.clone()),
            },
        )
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    }

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers WHERE cuit = $1")
        .bind(&cuit)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(count.0, 2);

    Ok(())
}
