use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod customers;
pub mod doc;
pub mod health;
pub mod invoices;
pub mod params;
pub mod products;
pub mod reports;
pub mod stock;
pub mod users;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        .nest("/stock", stock::router())
        .nest("/facturacion", invoices::router())
        .nest("/users", users::router())
        .nest("/auth", auth::router())
        .nest("/reports", reports::router())
}
