use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use facturador_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin", "admin@example.com", "admin123", "ADMIN").await?;
    ensure_user(&pool, "cajero", "cajero@example.com", "cajero123", "USER").await?;
    seed_customers(&pool).await?;
    seed_products(&pool, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch its id.
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_customers(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let customers = vec![
        ("Almacen Don Jorge", "20-12345678-9", Some("jorge@example.com")),
        ("Kiosco La Esquina", "27-87654321-0", None),
        ("Consumidor Final", "00-00000000-0", None),
    ];

    for (name, cuit, email) in customers {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM customers WHERE cuit = $1")
            .bind(cuit)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query("INSERT INTO customers (id, name, cuit, email) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(cuit)
            .bind(email)
            .execute(pool)
            .await?;
    }

    println!("Seeded customers");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let products = vec![
        ("Yerba 1kg", 2500.0, 40),
        ("Azucar 1kg", 900.0, 60),
        ("Fideos 500g", 750.0, 100),
        ("Aceite 900ml", 1800.0, 25),
    ];

    for (name, price, quantity) in products {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        let product_id = Uuid::new_v4();
        sqlx::query("INSERT INTO products (id, name, price, user_id) VALUES ($1, $2, $3, $4)")
            .bind(product_id)
            .bind(name)
            .bind(price)
            .bind(user_id)
            .execute(pool)
            .await?;
        sqlx::query("INSERT INTO stocks (id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(product_id)
            .bind(quantity)
            .execute(pool)
            .await?;
    }

    println!("Seeded products with stock");
    Ok(())
}
