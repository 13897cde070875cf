//! Point-of-sale cart. Pure in-memory accumulator with no I/O; the terminal
//! drives it and flushes the result into the invoice endpoint on checkout.

use uuid::Uuid;

use crate::dto::invoices::CreateInvoiceRequest;
use crate::models::Product;

/// IVA applied on the cart total at checkout.
pub const IVA_RATE: f64 = 0.21;

/// Fiscal defaults the terminal stamps on every checkout.
const CBTE_TIPO: i32 = 1;
const PTO_VTA: i32 = 1;
const CONCEPTO: i32 = 1;
const DOC_TIPO: i32 = 80;
const DOC_NRO: &str = "12345678";

#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    /// Unit price, editable at the terminal; starts at the product price.
    pub unit_price: f64,
    pub quantity: i32,
    /// Percentage in 0..=100.
    pub discount_pct: f64,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64 * (1.0 - self.discount_pct / 100.0)
    }
}

/// Lines are unique by product id; adding a product already present bumps
/// its quantity instead of appending a duplicate line.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            discount_pct: 0.0,
        });
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Absent products are ignored, same as the terminal's no-op updates.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    pub fn set_discount(&mut self, product_id: Uuid, discount_pct: f64) {
        if let Some(line) = self.line_mut(product_id) {
            line.discount_pct = discount_pct;
        }
    }

    pub fn set_price(&mut self, product_id: Uuid, unit_price: f64) {
        if let Some(line) = self.line_mut(product_id) {
            line.unit_price = unit_price;
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn tax(&self) -> f64 {
        self.total() * IVA_RATE
    }

    /// Flatten the cart into the invoice creation body. Per-line discounts do
    /// not survive the flattening; they are already folded into `amount`.
    /// Quantities ride along in `quantities` but the server only persists
    /// them when configured to carry line quantities.
    pub fn checkout_payload(&self, customer_id: Option<Uuid>) -> CreateInvoiceRequest {
        let amount = self.total();
        CreateInvoiceRequest {
            amount: Some(amount),
            product_ids: Some(self.lines.iter().map(|l| l.product_id).collect()),
            customer_id,
            cbte_tipo: Some(CBTE_TIPO),
            pto_vta: Some(PTO_VTA),
            concepto: Some(CONCEPTO),
            doc_tipo: Some(DOC_TIPO),
            doc_nro: Some(DOC_NRO.to_string()),
            imp_neto: Some(amount),
            imp_iva: Some(self.tax()),
            quantities: Some(self.lines.iter().map(|l| l.quantity).collect()),
        }
    }

    /// Callers clear only after the invoice endpoint confirms creation.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: Uuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
