use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        customers::{CreateCustomerRequest, CustomerList, DeleteCustomerRequest, UpdateCustomerRequest},
        invoices::{CreateInvoiceRequest, GeneratePdfRequest, InvoiceDetail, InvoiceLineDto, InvoiceList},
        products::{CreateProductRequest, DeleteProductRequest, ProductDetail, ProductList, UpdateProductRequest},
        reports::{BestSeller, BestSellerList, SalesReport},
        stock::{AdjustStockRequest, CreateStockRequest, StockDto, StockList},
        users::{ChangePasswordRequest, UpdateUserRequest},
    },
    models::{Customer, Invoice, InvoiceProduct, Product, Stock, User},
    response::{ApiResponse, Meta},
    routes::{auth, customers, health, invoices, params, products, reports, stock, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        customers::list_customers,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        products::list_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        stock::list_stock,
        stock::create_stock,
        stock::adjust_stock,
        invoices::facturacion_post,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::delete_invoice,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::change_password,
        reports::sales,
        reports::best_sellers
    ),
    components(
        schemas(
            User,
            Customer,
            Product,
            Stock,
            Invoice,
            InvoiceProduct,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            DeleteCustomerRequest,
            CustomerList,
            CreateProductRequest,
            UpdateProductRequest,
            DeleteProductRequest,
            ProductDetail,
            ProductList,
            CreateStockRequest,
            AdjustStockRequest,
            StockDto,
            StockList,
            CreateInvoiceRequest,
            GeneratePdfRequest,
            InvoiceLineDto,
            InvoiceDetail,
            InvoiceList,
            UpdateUserRequest,
            ChangePasswordRequest,
            SalesReport,
            BestSeller,
            BestSellerList,
            params::SearchQuery,
            Meta,
            ApiResponse<Customer>,
            ApiResponse<CustomerList>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<StockDto>,
            ApiResponse<StockList>,
            ApiResponse<InvoiceDetail>,
            ApiResponse<InvoiceList>,
            ApiResponse<User>,
            ApiResponse<LoginResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Stock", description = "Stock ledger endpoints"),
        (name = "Facturacion", description = "Invoice endpoints"),
        (name = "Users", description = "User administration endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Reports", description = "Reporting endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
