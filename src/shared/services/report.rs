//! PDF export of the current session's analyses.
//!
//! The document is rendered in two passes: content first, collecting the
//! page list, then footers stamped once the total page count is known.
//! Reports are generated and downloaded locally; the PDF bytes never leave
//! the browser, only a metadata entry is persisted.

use chrono::{DateTime, NaiveDate, Utc};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Px, Rgb,
};

use crate::domain::models::{CandidateImage, REFERRAL_NOTICE, User};
use crate::shared::errors::{AppError, Result};

const PAGE_W: f64 = 210.0;
const PAGE_H: f64 = 297.0;
const MARGIN: f64 = 18.0;
/// Footer clearance at the bottom of every page.
const FOOTER_ZONE: f64 = 22.0;

const THUMB_W: f64 = 58.0;
const THUMB_SOURCE_PX: u32 = 360;
const LINE: f64 = 6.0;

#[derive(Debug)]
pub struct GeneratedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
    pub analysis_count: usize,
}

/// Top-down layout cursor in millimetres. PDF space grows upward, so the
/// baseline handed to the writer is `PAGE_H - y`.
#[derive(Debug, Clone, Copy)]
pub struct PageCursor {
    y: f64,
}

impl PageCursor {
    pub fn new() -> Self {
        Self { y: MARGIN }
    }

    pub fn fits(&self, height: f64) -> bool {
        self.y + height <= PAGE_H - FOOTER_ZONE
    }

    /// Reserves `height` and returns the block's top edge.
    pub fn take(&mut self, height: f64) -> f64 {
        let top = self.y;
        self.y += height;
        top
    }

    pub fn used(&self) -> f64 {
        self.y
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("Retinopathy_Report_{}.pdf", date.format("%Y-%m-%d"))
}

fn export_err(err: impl std::fmt::Display) -> AppError {
    AppError::Export(err.to_string())
}

fn write_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    size: f64,
    x: f64,
    y_top: f64,
    text: &str,
) {
    layer.use_text(text, size as f32, Mm(x as f32), Mm((PAGE_H - y_top) as f32), font);
}

/// Decodes, shrinks and embeds one scan. Returns the printed height in mm,
/// or `None` when the bytes do not decode; the textual result block is kept
/// either way.
fn embed_thumbnail(layer: &PdfLayerReference, bytes: &[u8], x: f64, y_top: f64) -> Option<f64> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let thumb = decoded
        .thumbnail(THUMB_SOURCE_PX, THUMB_SOURCE_PX)
        .to_rgb8();
    let (w_px, h_px) = thumb.dimensions();

    const DPI: f64 = 300.0;
    let native_w_mm = w_px as f64 * 25.4 / DPI;
    let native_h_mm = h_px as f64 * 25.4 / DPI;
    let scale = THUMB_W / native_w_mm;
    let printed_h = native_h_mm * scale;

    let xobject = ImageXObject {
        width: Px(w_px as usize),
        height: Px(h_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: thumb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
    };
    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x as f32)),
            translate_y: Some(Mm((PAGE_H - y_top - printed_h) as f32)),
            scale_x: Some(scale as f32),
            scale_y: Some(scale as f32),
            dpi: Some(DPI as f32),
            ..Default::default()
        },
    );
    Some(printed_h)
}

/// Builds the full report for every analyzed image in the session.
/// Unanalyzed candidates are skipped; no analyzed image at all is
/// `NothingToExport`.
pub fn build_report(
    images: &[CandidateImage],
    patient: Option<&User>,
    generated_at: DateTime<Utc>,
) -> Result<GeneratedReport> {
    let analyzed: Vec<&CandidateImage> = images.iter().filter(|i| i.result.is_some()).collect();
    if analyzed.is_empty() {
        return Err(AppError::NothingToExport);
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Diabetic Retinopathy Analysis Report",
        Mm(PAGE_W as f32),
        Mm(PAGE_H as f32),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(export_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(export_err)?;

    let mut pages = vec![(first_page, first_layer)];
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor = PageCursor::new();

    layer.set_fill_color(Color::Rgb(Rgb::new(0.12, 0.16, 0.35, None)));
    let top = cursor.take(LINE * 2.0);
    write_line(&layer, &bold, 19.0, MARGIN, top + LINE, "Diabetic Retinopathy Analysis Report");

    layer.set_fill_color(Color::Rgb(Rgb::new(0.25, 0.25, 0.25, None)));
    let top = cursor.take(LINE);
    write_line(
        &layer,
        &regular,
        10.0,
        MARGIN,
        top + LINE * 0.8,
        &format!("Generated on {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
    );
    if let Some(user) = patient {
        let top = cursor.take(LINE);
        let line = match user.age {
            Some(age) => format!("Patient: {} ({}, age {age})", user.username, user.email),
            None => format!("Patient: {} ({})", user.username, user.email),
        };
        write_line(&layer, &regular, 10.0, MARGIN, top + LINE * 0.8, &line);
    }
    let top = cursor.take(LINE * 1.5);
    write_line(
        &layer,
        &regular,
        10.0,
        MARGIN,
        top + LINE * 0.8,
        &format!("Images analyzed: {}", analyzed.len()),
    );

    for (index, image) in analyzed.iter().enumerate() {
        // Result is present by the filter above.
        let Some(result) = image.result.as_ref() else {
            continue;
        };

        let text_lines = 3 + result.recommendations.len()
            + usize::from(result.is_dr_positive());
        let block_h = (THUMB_W * 0.8).max(text_lines as f64 * LINE) + LINE * 2.0;

        if !cursor.fits(block_h) {
            let (page, page_layer) = doc.add_page(Mm(PAGE_W as f32), Mm(PAGE_H as f32), "content");
            pages.push((page, page_layer));
            layer = doc.get_page(page).get_layer(page_layer);
            cursor = PageCursor::new();
        }

        let top = cursor.take(block_h);
        let text_x = MARGIN + THUMB_W + 8.0;

        embed_thumbnail(&layer, &image.bytes, MARGIN, top);

        layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
        write_line(
            &layer,
            &bold,
            12.0,
            text_x,
            top + LINE,
            &format!("Image {}: {}", index + 1, image.file_name),
        );
        let (r, g, b) = if result.is_dr_positive() {
            (0.72, 0.11, 0.11)
        } else {
            (0.09, 0.47, 0.22)
        };
        layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
        write_line(
            &layer,
            &bold,
            11.0,
            text_x,
            top + LINE * 2.0,
            &format!("Diagnosis: {}", result.stage),
        );
        layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
        write_line(
            &layer,
            &regular,
            10.0,
            text_x,
            top + LINE * 3.0,
            &format!("Confidence: {:.1}%", result.confidence),
        );

        let mut line_no = 4.0;
        for recommendation in &result.recommendations {
            write_line(
                &layer,
                &regular,
                9.0,
                text_x,
                top + LINE * line_no,
                &format!("- {recommendation}"),
            );
            line_no += 1.0;
        }
        if result.is_dr_positive() {
            layer.set_fill_color(Color::Rgb(Rgb::new(0.72, 0.11, 0.11, None)));
            write_line(&layer, &bold, 9.0, text_x, top + LINE * line_no, REFERRAL_NOTICE);
        }
    }

    // Second pass: page numbers need the final count.
    let total = pages.len();
    for (number, (page, page_layer)) in pages.iter().enumerate() {
        let layer = doc.get_page(*page).get_layer(*page_layer);
        layer.set_fill_color(Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None)));
        layer.use_text(
            format!("Page {} of {total}", number + 1),
            9.0,
            Mm((PAGE_W / 2.0 - 10.0) as f32),
            Mm(12.0),
            &regular,
        );
        layer.use_text(
            "RetinoAI screening support. Not a substitute for clinical judgment.",
            8.0,
            Mm(MARGIN as f32),
            Mm(7.0),
            &regular,
        );
    }

    let bytes = doc.save_to_bytes().map_err(export_err)?;
    Ok(GeneratedReport {
        bytes,
        file_name: report_file_name(generated_at.date_naive()),
        page_count: total,
        analysis_count: analyzed.len(),
    })
}

/// Hands the bytes to the browser as a one-shot object-URL download.
#[cfg(target_arch = "wasm32")]
pub fn download_pdf(bytes: &[u8], file_name: &str) -> Result<()> {
    use wasm_bindgen::JsCast;

    let js_err = |v: wasm_bindgen::JsValue| AppError::Export(format!("{v:?}"));

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let props = web_sys::BlobPropertyBag::new();
    props.set_type("application/pdf");
    let blob =
        web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Export("no browser document".into()))?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| AppError::Export("anchor element cast failed".into()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn download_pdf(_bytes: &[u8], _file_name: &str) -> Result<()> {
    Err(AppError::Export(
        "downloads require the browser runtime".into(),
    ))
}
