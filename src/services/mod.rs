pub mod auth_service;
pub mod customer_service;
pub mod invoice_service;
pub mod product_service;
pub mod report_service;
pub mod stock_service;
pub mod user_service;
