use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::invoices::{CreateInvoiceRequest, GeneratePdfRequest, InvoiceDetail, InvoiceList},
    error::{AppError, AppResult},
    response::ApiResponse,
    services::invoice_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct FacturacionAction {
    pub action: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(facturacion_post))
        .route("/{id}", get(get_invoice).delete(delete_invoice))
}

/// POST dispatches on `?action=`: the bare path creates an invoice, while
/// `?action=generate-pdf` renders an existing one and streams the bytes.
#[utoipa::path(
    post,
    path = "/api/facturacion",
    params(
        ("action" = Option<String>, Query, description = "Set to generate-pdf to render an invoice instead of creating one")
    ),
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created"),
        (status = 200, description = "PDF bytes", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "Facturacion"
)]
pub async fn facturacion_post(
    State(state): State<AppState>,
    Query(query): Query<FacturacionAction>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Response> {
    if query.action.as_deref() == Some("generate-pdf") {
        let payload: GeneratePdfRequest = serde_json::from_value(body)
            .map_err(|_| AppError::BadRequest("Missing invoiceId in request body".into()))?;
        let invoice_id = payload
            .invoice_id
            .ok_or_else(|| AppError::BadRequest("Missing invoiceId in request body".into()))?;

        let bytes = invoice_service::generate_pdf(&state, invoice_id).await?;
        let headers = [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=invoice_{invoice_id}.pdf"),
            ),
        ];
        return Ok((StatusCode::OK, headers, bytes).into_response());
    }

    let payload: CreateInvoiceRequest =
        serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let resp = invoice_service::create_invoice(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/facturacion",
    responses(
        (status = 200, description = "List invoices with customer and line items", body = ApiResponse<InvoiceList>)
    ),
    tag = "Facturacion"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<InvoiceList>>> {
    let resp = invoice_service::list_invoices(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/facturacion/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice with customer and line items", body = ApiResponse<InvoiceDetail>),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "Facturacion"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InvoiceDetail>>> {
    let resp = invoice_service::get_invoice(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/facturacion/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "Facturacion"
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = invoice_service::delete_invoice(&state, id).await?;
    Ok(Json(resp))
}
