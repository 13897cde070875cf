use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{CreateProductRequest, ProductDetail, ProductList, UpdateProductRequest},
    entity::{
        products::{
            ActiveModel as ProductActive, Column as ProductCol, Entity as Products,
            Model as ProductModel,
        },
        stocks::{
            ActiveModel as StockActive, Column as StockCol, Entity as Stocks,
            Model as StockModel,
        },
        users::{Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::{Product, Stock, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    search: Option<String>,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all();
    if let Some(search) = search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(ProductCol::Name).ilike(pattern));
    }

    let products = Products::find()
        .filter(condition)
        .order_by_asc(ProductCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let user_ids: Vec<Uuid> = products.iter().map(|p| p.user_id).collect();

    let users: HashMap<Uuid, UserModel> = Users::find()
        .filter(UserCol::Id.is_in(user_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut stocks_by_product: HashMap<Uuid, Vec<Stock>> = HashMap::new();
    for stock in Stocks::find()
        .filter(StockCol::ProductId.is_in(product_ids))
        .order_by_asc(StockCol::CreatedAt)
        .all(&state.orm)
        .await?
    {
        stocks_by_product
            .entry(stock.product_id)
            .or_default()
            .push(stock_from_entity(stock));
    }

    let items: Vec<ProductDetail> = products
        .into_iter()
        .map(|p| {
            let user = users.get(&p.user_id).cloned().map(user_from_entity);
            let stocks = stocks_by_product.remove(&p.id).unwrap_or_default();
            ProductDetail {
                product: product_from_entity(p),
                user,
                stocks,
            }
        })
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let name = payload
        .name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::BadRequest("price is required".into()))?;
    if price <= 0.0 {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }
    let user_id = payload
        .user_id
        .ok_or_else(|| AppError::BadRequest("userId is required".into()))?;
    let quantity = payload
        .quantity
        .ok_or_else(|| AppError::BadRequest("quantity is required".into()))?;
    if quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }

    // Product and its first stock row land together or not at all.
    let txn = state.orm.begin().await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        price: Set(price),
        user_id: Set(user_id),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    StockActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product.id),
        quantity: Set(quantity),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest("id is required".into()))?;
    let name = payload
        .name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::BadRequest("price is required".into()))?;
    if price <= 0.0 {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }
    let quantity = payload
        .quantity
        .ok_or_else(|| AppError::BadRequest("quantity is required".into()))?;
    if quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    // The edit screen always targets the product's first stock row, even
    // when duplicates exist for the same product.
    let stock = Stocks::find()
        .filter(StockCol::ProductId.eq(id))
        .order_by_asc(StockCol::CreatedAt)
        .one(&state.orm)
        .await?;
    let stock = match stock {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let txn = state.orm.begin().await?;

    let mut active: ProductActive = existing.into();
    active.name = Set(name);
    active.price = Set(price);
    let product = active.update(&txn).await?;

    let mut stock_active: StockActive = stock.into();
    stock_active.quantity = Set(quantity);
    stock_active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        price: model.price,
        user_id: model.user_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn stock_from_entity(model: StockModel) -> Stock {
    Stock {
        id: model.id,
        product_id: model.product_id,
        quantity: model.quantity,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        role: model.role,
        blocked: model.blocked,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
