pub mod audit_logs;
pub mod customers;
pub mod invoice_products;
pub mod invoices;
pub mod products;
pub mod stocks;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use customers::Entity as Customers;
pub use invoice_products::Entity as InvoiceProducts;
pub use invoices::Entity as Invoices;
pub use products::Entity as Products;
pub use stocks::Entity as Stocks;
pub use users::Entity as Users;
