pub mod auth;
pub mod customers;
pub mod invoices;
pub mod products;
pub mod reports;
pub mod stock;
pub mod users;
