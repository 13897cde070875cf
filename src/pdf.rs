//! Invoice PDF rendering. Single fixed-size page: header, customer block,
//! one line per product name, then the amount/IVA/total block. Both assets
//! (font and logo) must be present; there is no builtin-font fallback.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::error::{AppError, AppResult};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 148.0;
const MARGIN: f32 = 15.0;
const BODY_SIZE: f32 = 11.0;

pub struct InvoicePdfData {
    pub customer_name: String,
    pub customer_email: String,
    pub product_names: Vec<String>,
    pub amount: f64,
    pub imp_iva: f64,
    pub imp_total: f64,
}

pub fn render_invoice_pdf(assets_dir: &Path, data: &InvoicePdfData) -> AppResult<Vec<u8>> {
    let font_path = assets_dir.join("Roboto-Regular.ttf");
    let logo_path = assets_dir.join("logo.png");

    let (doc, page, layer) = PdfDocument::new("Factura", Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let font_file = File::open(&font_path)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Font file not found")))?;
    let font = doc
        .add_external_font(BufReader::new(font_file))
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let logo_file = File::open(&logo_path)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Logo file not found")))?;
    let decoder = PngDecoder::new(BufReader::new(logo_file))
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    let logo = Image::try_from(decoder)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    logo.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(PAGE_W - 45.0)),
            translate_y: Some(Mm(PAGE_H - 30.0)),
            scale_x: Some(0.2),
            scale_y: Some(0.2),
            ..Default::default()
        },
    );

    layer.use_text("Factura", 30.0, Mm(MARGIN), Mm(PAGE_H - 20.0), &font);
    layer.use_text(
        format!("Cliente: {}", data.customer_name),
        BODY_SIZE,
        Mm(MARGIN),
        Mm(PAGE_H - 32.0),
        &font,
    );
    layer.use_text(
        format!("Email: {}", data.customer_email),
        BODY_SIZE,
        Mm(MARGIN),
        Mm(PAGE_H - 39.0),
        &font,
    );

    let mut y = PAGE_H - 48.0;
    for (idx, name) in data.product_names.iter().enumerate() {
        layer.use_text(
            format!("Producto {}: {}", idx + 1, name),
            BODY_SIZE,
            Mm(MARGIN),
            Mm(y),
            &font,
        );
        y -= 7.0;
    }

    y -= 7.0;
    layer.use_text(
        format!("Monto: ${:.2}", data.amount),
        BODY_SIZE,
        Mm(MARGIN),
        Mm(y),
        &font,
    );
    y -= 7.0;
    layer.use_text(
        format!("IVA: ${:.2}", data.imp_iva),
        BODY_SIZE,
        Mm(MARGIN),
        Mm(y),
        &font,
    );
    y -= 7.0;
    layer.use_text(
        format!("Total: ${:.2}", data.imp_total),
        BODY_SIZE,
        Mm(MARGIN),
        Mm(y),
        &font,
    );

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}
