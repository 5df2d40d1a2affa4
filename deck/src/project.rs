//! Presentation -> page layout mapping.
//!
//! This stage is pure: it turns a presentation into a sequence of page
//! layouts, one per slide in slide order, with every coordinate already
//! resolved. The PDF writer only draws what this stage computed.

use tutor_core::model::Presentation;

use crate::layout::{
    wrap_text, BODY_FONT_PT, BODY_START_WITHOUT_IMAGE_MM, BODY_START_WITH_IMAGE_MM,
    BODY_WIDTH_FULL_MM, BODY_WIDTH_SPLIT_MM, BULLET_GAP_MM, IMAGE_HEIGHT_MM, IMAGE_WIDTH_MM,
    IMAGE_X_MM, IMAGE_Y_MM, LINE_HEIGHT_MM,
};

/// Placement of a slide's generated image in the right column
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    /// Image payload as a data URI
    pub data_uri: String,
}

/// One bullet point, wrapped to the body column
#[derive(Debug, Clone, PartialEq)]
pub struct BulletBlock {
    /// Baseline of the block's first line, measured from the top edge
    pub y_mm: f32,
    pub lines: Vec<String>,
}

/// Fully resolved layout of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub header_left: String,
    pub header_right: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub text_column_width_mm: f32,
    pub bullets: Vec<BulletBlock>,
    pub image: Option<ImagePlacement>,
}

/// Projects a presentation into page layouts, one page per slide
pub fn project(presentation: &Presentation) -> Vec<PageLayout> {
    let total = presentation.slides.len();

    presentation
        .slides
        .iter()
        .enumerate()
        .map(|(index, slide)| {
            let image = slide.generated_image_base64.as_ref().map(|data_uri| {
                ImagePlacement {
                    x_mm: IMAGE_X_MM,
                    y_mm: IMAGE_Y_MM,
                    width_mm: IMAGE_WIDTH_MM,
                    height_mm: IMAGE_HEIGHT_MM,
                    data_uri: data_uri.clone(),
                }
            });

            // The image column halves the body width and raises the first bullet
            let text_column_width_mm = if image.is_some() {
                BODY_WIDTH_SPLIT_MM
            } else {
                BODY_WIDTH_FULL_MM
            };
            let mut cursor_mm = if image.is_some() {
                BODY_START_WITH_IMAGE_MM
            } else {
                BODY_START_WITHOUT_IMAGE_MM
            };

            let mut bullets = Vec::with_capacity(slide.content.len());
            for point in &slide.content {
                let lines = wrap_text(
                    &format!("• {}", point),
                    text_column_width_mm,
                    BODY_FONT_PT,
                );
                let advance = lines.len() as f32 * LINE_HEIGHT_MM + BULLET_GAP_MM;
                bullets.push(BulletBlock {
                    y_mm: cursor_mm,
                    lines,
                });
                cursor_mm += advance;
            }

            PageLayout {
                header_left: presentation.topic.clone(),
                header_right: format!("Slide {}/{}", index + 1, total),
                title: slide.title.clone(),
                subtitle: slide.subtitle.clone(),
                text_column_width_mm,
                bullets,
                image,
            }
        })
        .collect()
}
