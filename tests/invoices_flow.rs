mod common;

use common::{create_product, create_user, setup_state};
use facturador_api::{
    cart::Cart,
    dto::customers::CreateCustomerRequest,
    dto::invoices::CreateInvoiceRequest,
    error::AppError,
    models::Product,
    services::{customer_service, invoice_service},
    state::AppState,
};
use uuid::Uuid;

fn invoice_request(
    amount: f64,
    imp_iva: f64,
    product_ids: Vec<Uuid>,
    customer_id: Option<Uuid>,
) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        amount: Some(amount),
        product_ids: Some(product_ids),
        customer_id,
        cbte_tipo: Some(1),
        pto_vta: Some(1),
        concepto: Some(1),
        doc_tipo: Some(80),
        doc_nro: Some("12345678".into()),
        imp_neto: Some(amount),
        imp_iva: Some(imp_iva),
        quantities: None,
    }
}

async fn create_customer(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let resp = customer_service::create_customer(
        state,
        CreateCustomerRequest {
            name: Some(name.to_string()),
            email: Some("cliente@example.com".into()),
            phone: None,
            cuit: Some("20-12345678-9".into()),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(resp.data.expect("created customer").id)
}

// Duplicate product ids collapse to one line per distinct id, quantity 1;
// the total is amount + IVA, computed once.
#[tokio::test]
async fn invoice_creation_flattens_duplicate_lines() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "ADMIN").await?;
    let product_a = create_product(&state, user_id, "Yerba", 2500.0, 10).await?;
    let product_b = create_product(&state, user_id, "Azucar", 900.0, 10).await?;

    let resp = invoice_service::create_invoice(
        &state,
        invoice_request(100.0, 21.0, vec![product_a, product_a, product_b], None),
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let invoice = resp.data.expect("created invoice");

    assert_eq!(invoice.imp_total, Some(121.0));
    assert_eq!(invoice.imp_total, Some(invoice.amount + invoice.imp_iva.unwrap()));

    let detail = invoice_service::get_invoice(&state, invoice.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("invoice detail");

    assert_eq!(detail.products.len(), 2, "one line per distinct product id");
    for line in &detail.products {
        assert_eq!(line.quantity, 1, "cart quantities are not preserved");
    }
    let line_products: Vec<Uuid> = detail
        .products
        .iter()
        .filter_map(|l| l.product.as_ref().map(|p| p.id))
        .collect();
    assert!(line_products.contains(&product_a));
    assert!(line_products.contains(&product_b));

    Ok(())
}

#[tokio::test]
async fn invoice_with_missing_fields_is_rejected_before_storage() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let marker_amount = 777.77;
    let mut payload = invoice_request(marker_amount, 21.0, vec![], None);
    payload.doc_nro = None;

    let err = invoice_service::create_invoice(&state, payload)
        .await
        .expect_err("missing docNro must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));

    let persisted: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM invoices WHERE amount = $1")
        .bind(marker_amount)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(persisted.0, 0, "rejected invoice must not touch storage");

    Ok(())
}

// The documented terminal scenario: 3 x $10, no discount. The persisted
// invoice keeps the aggregate amounts while the line drops to quantity 1.
#[tokio::test]
async fn pos_checkout_scenario() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "ADMIN").await?;
    let product_id = create_product(&state, user_id, "Yerba", 10.0, 10).await?;
    let customer_id = create_customer(&state, "Juan Perez").await?;

    let mut cart = Cart::new();
    let product = Product {
        id: product_id,
        name: "Yerba".into(),
        price: 10.0,
        user_id,
        created_at: chrono::Utc::now(),
    };
    cart.add(&product);
    cart.set_quantity(product_id, 3);

    let payload = cart.checkout_payload(Some(customer_id));
    assert_eq!(payload.amount, Some(30.0));
    assert_eq!(payload.imp_iva, Some(6.3));

    let resp = invoice_service::create_invoice(&state, payload)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let invoice = resp.data.expect("created invoice");
    cart.clear();

    assert_eq!(invoice.amount, 30.0);
    assert_eq!(invoice.imp_iva, Some(6.3));
    assert_eq!(invoice.imp_total, Some(36.3));

    let detail = invoice_service::get_invoice(&state, invoice.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("invoice detail");
    assert_eq!(detail.products.len(), 1);
    assert_eq!(detail.products[0].quantity, 1, "not 3");
    assert_eq!(
        detail.customer.as_ref().map(|c| c.id),
        Some(customer_id)
    );

    Ok(())
}

#[tokio::test]
async fn unknown_invoice_is_not_found_not_a_storage_error() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let err = invoice_service::get_invoice(&state, Uuid::new_v4())
        .await
        .expect_err("unknown id");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn invoice_delete_removes_lines() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "ADMIN").await?;
    let product_id = create_product(&state, user_id, "Fideos", 750.0, 10).await?;

    let invoice = invoice_service::create_invoice(
        &state,
        invoice_request(50.0, 10.5, vec![product_id], None),
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("created invoice");

    invoice_service::delete_invoice(&state, invoice.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let lines: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM invoice_products WHERE invoice_id = $1")
            .bind(invoice.id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(lines.0, 0);

    let err = invoice_service::delete_invoice(&state, invoice.id)
        .await
        .expect_err("second delete");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

// Corrected contract behind the config switch: quantities ride through, and
// duplicate ids accumulate instead of collapsing to 1.
#[tokio::test]
async fn carried_quantities_when_configured() -> anyhow::Result<()> {
    let Some(mut state) = setup_state().await? else {
        return Ok(());
    };
    state.config.carry_line_quantities = true;

    let user_id = create_user(&state, "ADMIN").await?;
    let product_id = create_product(&state, user_id, "Aceite", 1800.0, 10).await?;

    let mut payload = invoice_request(90.0, 18.9, vec![product_id, product_id], None);
    payload.quantities = Some(vec![2, 3]);

    let invoice = invoice_service::create_invoice(&state, payload)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("created invoice");

    let detail = invoice_service::get_invoice(&state, invoice.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("invoice detail");
    assert_eq!(detail.products.len(), 1);
    assert_eq!(detail.products[0].quantity, 5);

    Ok(())
}

// Rendering must survive a deleted customer, substituting a placeholder.
// Needs the PDF assets on disk; skipped otherwise.
#[tokio::test]
async fn pdf_renders_after_customer_deletion() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    if !state.config.assets_dir.join("Roboto-Regular.ttf").exists()
        || !state.config.assets_dir.join("logo.png").exists()
    {
        eprintln!(
            "Skipping test: place Roboto-Regular.ttf and logo.png under {:?}",
            state.config.assets_dir
        );
        return Ok(());
    }

    let user_id = create_user(&state, "ADMIN").await?;
    let product_id = create_product(&state, user_id, "Yerba", 2500.0, 10).await?;
    let customer_id = create_customer(&state, "Cliente Temporal").await?;

    let invoice = invoice_service::create_invoice(
        &state,
        invoice_request(30.0, 6.3, vec![product_id], Some(customer_id)),
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("created invoice");

    customer_service::delete_customer(&state, customer_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let bytes = invoice_service::generate_pdf(&state, invoice.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(bytes.starts_with(b"%PDF"));

    Ok(())
}
