use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Customer, Invoice, Product};

/// Invoice creation body. Every field except `customerId` and `quantities`
/// must be present; the check is presence-only, mirroring the contract the
/// point-of-sale screen was built against.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub amount: Option<f64>,
    pub product_ids: Option<Vec<Uuid>>,
    pub customer_id: Option<Uuid>,
    pub cbte_tipo: Option<i32>,
    pub pto_vta: Option<i32>,
    pub concepto: Option<i32>,
    pub doc_tipo: Option<i32>,
    pub doc_nro: Option<String>,
    pub imp_neto: Option<f64>,
    #[serde(rename = "impIVA")]
    pub imp_iva: Option<f64>,
    /// Parallel to `productIds`. Only honored when the server is configured
    /// to carry per-line quantities; ignored otherwise.
    pub quantities: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfRequest {
    pub invoice_id: Option<Uuid>,
}

/// One persisted line item with its product expanded. The product is
/// optional because product deletion is not guarded against existing lines.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceLineDto {
    pub id: Uuid,
    pub quantity: i32,
    pub product: Option<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub customer: Option<Customer>,
    pub products: Vec<InvoiceLineDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceList {
    pub items: Vec<InvoiceDetail>,
}
