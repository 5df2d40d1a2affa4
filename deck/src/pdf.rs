//! Page layout -> PDF bytes.
//!
//! Draws the layouts computed by [`crate::project`] onto landscape A4
//! pages using the builtin Helvetica fonts. There is no overflow handling:
//! body text that runs past the canvas is clipped, matching the projector
//! contract.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use printpdf::image_crate::codecs::jpeg::JpegDecoder;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Point, Polygon, Rgb,
};
use tracing::warn;
use tutor_core::data_uri;
use tutor_core::model::Presentation;

use crate::error::{DeckError, DeckResult};
use crate::layout::{
    text_width_mm, BODY_FONT_PT, BODY_X_MM, COLOR_BACKGROUND, COLOR_HEADER, COLOR_HEADER_TEXT,
    COLOR_SUBTITLE, COLOR_TEXT, HEADER_FONT_PT, HEADER_HEIGHT_MM, HEADER_RIGHT_EDGE_MM,
    HEADER_TEXT_X_MM, HEADER_TEXT_Y_MM, LINE_HEIGHT_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
    SUBTITLE_FONT_PT, SUBTITLE_Y_MM, TITLE_FONT_PT, TITLE_X_MM, TITLE_Y_MM,
};
use crate::project::{project, PageLayout};

const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

/// Renders a presentation into PDF bytes, one page per slide
pub fn render_pdf(presentation: &Presentation) -> DeckResult<Vec<u8>> {
    let pages = project(presentation);

    let (doc, first_page, first_layer) = PdfDocument::new(
        &presentation.topic,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Slide 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DeckError::PdfError(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DeckError::PdfError(e.to_string()))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Slide {}", index + 1),
            );
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &regular, &bold);
    }

    doc.save_to_bytes()
        .map_err(|e| DeckError::PdfError(e.to_string()))
}

/// Renders a presentation and writes it to `path`
pub fn write_pdf_file(presentation: &Presentation, path: &Path) -> DeckResult<()> {
    let bytes = render_pdf(presentation)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &PageLayout,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    // Background and header band
    fill_rect(layer, 0.0, 0.0, PAGE_WIDTH_MM, PAGE_HEIGHT_MM, COLOR_BACKGROUND);
    fill_rect(layer, 0.0, 0.0, PAGE_WIDTH_MM, HEADER_HEIGHT_MM, COLOR_HEADER);

    // Header text: topic on the left, page counter right-aligned
    set_fill(layer, COLOR_HEADER_TEXT);
    draw_text(layer, &page.header_left, HEADER_FONT_PT, HEADER_TEXT_X_MM, HEADER_TEXT_Y_MM, regular);
    let counter_x = HEADER_RIGHT_EDGE_MM - text_width_mm(&page.header_right, HEADER_FONT_PT);
    draw_text(layer, &page.header_right, HEADER_FONT_PT, counter_x, HEADER_TEXT_Y_MM, regular);

    // Title block
    set_fill(layer, COLOR_TEXT);
    draw_text(layer, &page.title, TITLE_FONT_PT, TITLE_X_MM, TITLE_Y_MM, bold);
    if let Some(subtitle) = &page.subtitle {
        set_fill(layer, COLOR_SUBTITLE);
        draw_text(layer, subtitle, SUBTITLE_FONT_PT, TITLE_X_MM, SUBTITLE_Y_MM, regular);
    }

    // Image column. A payload that fails to decode keeps the split layout
    // but skips the draw.
    if let Some(placement) = &page.image {
        match decode_image(&placement.data_uri) {
            Ok(image) => {
                let width_px = image.image.width.0 as f32;
                let height_px = image.image.height.0 as f32;
                let natural_width_mm = width_px * MM_PER_INCH / IMAGE_DPI;
                let natural_height_mm = height_px * MM_PER_INCH / IMAGE_DPI;

                let translate_y =
                    PAGE_HEIGHT_MM - placement.y_mm - placement.height_mm;
                image.add_to_layer(
                    layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(placement.x_mm)),
                        translate_y: Some(Mm(translate_y)),
                        scale_x: Some(placement.width_mm / natural_width_mm),
                        scale_y: Some(placement.height_mm / natural_height_mm),
                        dpi: Some(IMAGE_DPI),
                        ..Default::default()
                    },
                );
            }
            Err(e) => warn!("Skipping slide image: {}", e),
        }
    }

    // Bullet blocks
    set_fill(layer, COLOR_TEXT);
    for bullet in &page.bullets {
        for (line_index, line) in bullet.lines.iter().enumerate() {
            let y = bullet.y_mm + line_index as f32 * LINE_HEIGHT_MM;
            draw_text(layer, line, BODY_FONT_PT, BODY_X_MM, y, regular);
        }
    }
}

/// Draws text at a position given from the top edge of the page
fn draw_text(
    layer: &PdfLayerReference,
    text: &str,
    font_size_pt: f32,
    x_mm: f32,
    y_from_top_mm: f32,
    font: &IndirectFontRef,
) {
    layer.use_text(
        text,
        font_size_pt,
        Mm(x_mm),
        Mm(PAGE_HEIGHT_MM - y_from_top_mm),
        font,
    );
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (u8, u8, u8)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    )));
}

/// Fills a rectangle given in top-origin page coordinates
fn fill_rect(
    layer: &PdfLayerReference,
    x_mm: f32,
    top_mm: f32,
    width_mm: f32,
    height_mm: f32,
    color: (u8, u8, u8),
) {
    set_fill(layer, color);
    let bottom = PAGE_HEIGHT_MM - top_mm - height_mm;
    let ring = vec![
        (Point::new(Mm(x_mm), Mm(bottom)), false),
        (Point::new(Mm(x_mm + width_mm), Mm(bottom)), false),
        (Point::new(Mm(x_mm + width_mm), Mm(bottom + height_mm)), false),
        (Point::new(Mm(x_mm), Mm(bottom + height_mm)), false),
    ];
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

/// Decodes a data-URI image payload into an embeddable PDF image.
/// PNG and JPEG are supported; the mime type decides the decoder, with a
/// magic-byte sniff as fallback.
fn decode_image(uri: &str) -> DeckResult<Image> {
    let bytes = data_uri::decode(uri).map_err(|e| DeckError::ImageError(e.to_string()))?;

    let is_png = match data_uri::mime_type(uri) {
        Some(mime) if mime.contains("png") => true,
        Some(mime) if mime.contains("jpeg") || mime.contains("jpg") => false,
        _ => bytes.starts_with(&[0x89, b'P', b'N', b'G']),
    };

    if is_png {
        let decoder = PngDecoder::new(Cursor::new(bytes))
            .map_err(|e| DeckError::ImageError(format!("PNG decode failed: {}", e)))?;
        Image::try_from(decoder)
            .map_err(|e| DeckError::ImageError(format!("PNG embed failed: {}", e)))
    } else {
        let decoder = JpegDecoder::new(Cursor::new(bytes))
            .map_err(|e| DeckError::ImageError(format!("JPEG decode failed: {}", e)))?;
        Image::try_from(decoder)
            .map_err(|e| DeckError::ImageError(format!("JPEG embed failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::model::Slide;

    /// 1x1 PNG pixel
    const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    fn sample(with_image: bool) -> Presentation {
        Presentation {
            topic: "Fotossíntese".to_string(),
            slides: vec![
                Slide {
                    title: "Fotossíntese".to_string(),
                    subtitle: Some("Como as plantas produzem energia".to_string()),
                    content: vec!["Processo de conversão de luz".to_string()],
                    image_prompt: "Folha ao sol".to_string(),
                    generated_image_base64: with_image.then(|| TINY_PNG.to_string()),
                },
                Slide {
                    title: "Conclusão".to_string(),
                    subtitle: None,
                    content: vec!["Resumo".to_string(), "Próximos passos".to_string()],
                    image_prompt: "Planta crescendo".to_string(),
                    generated_image_base64: None,
                },
            ],
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_pdf(&sample(false)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_with_embedded_image() {
        let bytes = render_pdf(&sample(true)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_undecodable_image_is_skipped_not_fatal() {
        let mut presentation = sample(true);
        presentation.slides[0].generated_image_base64 =
            Some("data:image/png;base64,bm90LWEtcG5n".to_string());
        let bytes = render_pdf(&presentation).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        assert!(decode_image("data:image/png;base64,!!!").is_err());
    }
}
