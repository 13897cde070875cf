use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::invoices::{CreateInvoiceRequest, InvoiceDetail, InvoiceLineDto, InvoiceList},
    entity::{
        customers::Model as CustomerModel,
        invoice_products::{
            ActiveModel as LineActive, Column as LineCol, Entity as InvoiceProducts,
        },
        invoices::{ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices,
            Model as InvoiceModel,
        },
        products::{Entity as Products, Model as ProductModel},
        Customers,
    },
    error::{AppError, AppResult},
    models::{Customer, Invoice, Product},
    pdf::{self, InvoicePdfData},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_invoice(
    state: &AppState,
    payload: CreateInvoiceRequest,
) -> AppResult<ApiResponse<Invoice>> {
    // Presence-only check; customerId may be null (walk-in sale).
    let (
        Some(amount),
        Some(product_ids),
        Some(cbte_tipo),
        Some(pto_vta),
        Some(concepto),
        Some(doc_tipo),
        Some(doc_nro),
        Some(imp_neto),
        Some(imp_iva),
    ) = (
        payload.amount,
        payload.product_ids,
        payload.cbte_tipo,
        payload.pto_vta,
        payload.concepto,
        payload.doc_tipo,
        payload.doc_nro,
        payload.imp_neto,
        payload.imp_iva,
    )
    else {
        return Err(AppError::BadRequest("all fields are required".into()));
    };

    let imp_total = amount + imp_iva;
    let quantities = payload.quantities.unwrap_or_default();

    // One line per distinct product id. Quantities default to the legacy
    // fixed 1; when the server carries line quantities, duplicates of the
    // same product accumulate instead.
    let mut lines: Vec<(Uuid, i32)> = Vec::new();
    for (idx, product_id) in product_ids.iter().enumerate() {
        let quantity = if state.config.carry_line_quantities {
            quantities.get(idx).copied().unwrap_or(1).max(1)
        } else {
            1
        };
        match lines.iter_mut().find(|(id, _)| id == product_id) {
            Some(line) => {
                if state.config.carry_line_quantities {
                    line.1 += quantity;
                }
            }
            None => lines.push((*product_id, quantity)),
        }
    }

    let txn = state.orm.begin().await?;

    let invoice = InvoiceActive {
        id: Set(Uuid::new_v4()),
        amount: Set(amount),
        customer_id: Set(payload.customer_id),
        cbte_tipo: Set(Some(cbte_tipo)),
        pto_vta: Set(Some(pto_vta)),
        concepto: Set(Some(concepto)),
        doc_tipo: Set(Some(doc_tipo)),
        doc_nro: Set(Some(doc_nro)),
        imp_neto: Set(Some(imp_neto)),
        imp_iva: Set(Some(imp_iva)),
        imp_total: Set(Some(imp_total)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for (product_id, quantity) in lines {
        LineActive {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "invoice_create",
        Some("invoices"),
        Some(serde_json::json!({ "invoice_id": invoice.id, "amount": invoice.amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Invoice created",
        invoice_from_entity(invoice),
        Some(Meta::empty()),
    ))
}

pub async fn list_invoices(state: &AppState) -> AppResult<ApiResponse<InvoiceList>> {
    let invoices = Invoices::find()
        .find_also_related(Customers)
        .order_by_desc(InvoiceCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = invoices.iter().map(|(inv, _)| inv.id).collect();
    let mut lines_by_invoice = load_lines(state, ids).await?;

    let items: Vec<InvoiceDetail> = invoices
        .into_iter()
        .map(|(invoice, customer)| {
            let products = lines_by_invoice.remove(&invoice.id).unwrap_or_default();
            InvoiceDetail {
                invoice: invoice_from_entity(invoice),
                customer: customer.map(customer_from_entity),
                products,
            }
        })
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Invoices",
        InvoiceList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_invoice(state: &AppState, id: Uuid) -> AppResult<ApiResponse<InvoiceDetail>> {
    let found = Invoices::find_by_id(id)
        .find_also_related(Customers)
        .one(&state.orm)
        .await?;
    let (invoice, customer) = match found {
        Some(pair) => pair,
        None => return Err(AppError::NotFound),
    };

    let mut lines_by_invoice = load_lines(state, vec![invoice.id]).await?;
    let products = lines_by_invoice.remove(&invoice.id).unwrap_or_default();

    Ok(ApiResponse::success(
        "Invoice",
        InvoiceDetail {
            invoice: invoice_from_entity(invoice),
            customer: customer.map(customer_from_entity),
            products,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_invoice(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // Line items go with the invoice via the FK cascade.
    let result = Invoices::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "invoice_delete",
        Some("invoices"),
        Some(serde_json::json!({ "invoice_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Load the invoice with customer and products and lay it out as a PDF.
/// A deleted or never-assigned customer renders as "Desconocido".
pub async fn generate_pdf(state: &AppState, invoice_id: Uuid) -> AppResult<Vec<u8>> {
    let found = Invoices::find_by_id(invoice_id)
        .find_also_related(Customers)
        .one(&state.orm)
        .await?;
    let (invoice, customer) = match found {
        Some(pair) => pair,
        None => return Err(AppError::NotFound),
    };

    let product_names: Vec<String> = InvoiceProducts::find()
        .filter(LineCol::InvoiceId.eq(invoice.id))
        .find_also_related(Products)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(_, product)| product.map(|p| p.name))
        .collect();

    let (customer_name, customer_email) = match customer {
        Some(c) => (c.name, c.email.unwrap_or_default()),
        None => ("Desconocido".to_string(), String::new()),
    };

    let data = InvoicePdfData {
        customer_name,
        customer_email,
        product_names,
        amount: invoice.amount,
        imp_iva: invoice.imp_iva.unwrap_or(0.0),
        imp_total: invoice.imp_total.unwrap_or(0.0),
    };

    pdf::render_invoice_pdf(&state.config.assets_dir, &data)
}

async fn load_lines(
    state: &AppState,
    invoice_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<InvoiceLineDto>>> {
    let mut by_invoice: HashMap<Uuid, Vec<InvoiceLineDto>> = HashMap::new();
    if invoice_ids.is_empty() {
        return Ok(by_invoice);
    }

    let lines = InvoiceProducts::find()
        .filter(LineCol::InvoiceId.is_in(invoice_ids))
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    for (line, product) in lines {
        by_invoice
            .entry(line.invoice_id)
            .or_default()
            .push(InvoiceLineDto {
                id: line.id,
                quantity: line.quantity,
                product: product.map(product_from_entity),
            });
    }

    Ok(by_invoice)
}

fn invoice_from_entity(model: InvoiceModel) -> Invoice {
    Invoice {
        id: model.id,
        amount: model.amount,
        customer_id: model.customer_id,
        cbte_tipo: model.cbte_tipo,
        pto_vta: model.pto_vta,
        concepto: model.concepto,
        doc_tipo: model.doc_tipo,
        doc_nro: model.doc_nro,
        imp_neto: model.imp_neto,
        imp_iva: model.imp_iva,
        imp_total: model.imp_total,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        cuit: model.cuit,
        created_at: model.created_at.with_timezone(&Utc),
    }
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
