#![allow(dead_code)]

use std::path::PathBuf;

use facturador_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::products::CreateProductRequest,
    services::product_service,
    state::AppState,
};
use uuid::Uuid;

/// Connect to the test database, or return None so the caller can skip when
/// no database is configured in the environment.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    // The embedded migrator takes an advisory lock, so concurrent test
    // threads do not race on schema creation.
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(&database_url).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        assets_dir: PathBuf::from(
            std::env::var("ASSETS_DIR").unwrap_or_else(|_| "./assets".into()),
        ),
        carry_line_quantities: false,
    };

    Ok(Some(AppState { pool, orm, config }))
}

/// Insert a user directly; tests need an owner for products.
pub async fn create_user(state: &AppState, role: &str) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(format!("user-{id}"))
    .bind(format!("user-{id}@example.com"))
    .bind("dummy")
    .bind(role)
    .execute(&state.pool)
    .await?;
    Ok(id)
}

/// Create a product through the service so its first stock row exists too.
pub async fn create_product(
    state: &AppState,
    user_id: Uuid,
    name: &str,
    price: f64,
    quantity: i32,
) -> anyhow::Result<Uuid> {
    let resp = product_service::create_product(
        state,
        CreateProductRequest {
            name: Some(format!("{name}-{}", Uuid::new_v4())),
            price: Some(price),
            user_id: Some(user_id),
            quantity: Some(quantity),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(resp.data.expect("created product").id)
}
