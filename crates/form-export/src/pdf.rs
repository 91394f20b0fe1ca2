//! PDF writer for a single composed page.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::compositor::{DrawOp, FormPlan, MARK_GLYPH};
use crate::template::TemplateImage;
use crate::text::encode_win_ansi;

const FONT_NAME: Name<'static> = Name(b"F1");
const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Encode `plan` as a one-page PDF.
///
/// `Background` ops are skipped when `background` is `None`.
pub fn write_pdf(plan: &FormPlan, background: Option<&TemplateImage>, title: &str) -> Vec<u8> {
    let geometry = &plan.geometry;
    let page_height = geometry.page_height;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let font_id = Ref::new(5);
    let image_id = Ref::new(6);
    let info_id = Ref::new(7);

    let mut pdf = Pdf::new();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(
        0.0,
        0.0,
        geometry.page_width as f32,
        geometry.page_height as f32,
    ));
    page.parent(page_tree_id);
    page.contents(content_id);
    let mut resources = page.resources();
    resources.fonts().pair(FONT_NAME, font_id);
    if background.is_some() {
        resources.x_objects().pair(IMAGE_NAME, image_id);
    }
    resources.finish();
    page.finish();

    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    if let Some(template) = background {
        let data = flate_compress(template.pixels.as_raw());
        let mut image = pdf.image_xobject(image_id, &data);
        image.filter(Filter::FlateDecode);
        image.width(template.width() as i32);
        image.height(template.height() as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();
    }

    let mut content = Content::new();
    for op in &plan.ops {
        match op {
            DrawOp::Background {
                x,
                y,
                width,
                height,
            } => {
                if background.is_none() {
                    continue;
                }
                content.save_state();
                content.transform([
                    *width as f32,
                    0.0,
                    0.0,
                    *height as f32,
                    *x as f32,
                    (page_height - y - height) as f32,
                ]);
                content.x_object(IMAGE_NAME);
                content.restore_state();
            }
            DrawOp::Text {
                x,
                y,
                font_size,
                line_advance,
                lines,
            } => {
                for (i, line) in lines.iter().enumerate() {
                    let baseline = y + i as f64 * line_advance;
                    show_text(&mut content, line, *x, page_height - baseline, *font_size);
                }
            }
            DrawOp::Mark { x, y, font_size } => {
                show_text(&mut content, MARK_GLYPH, *x, page_height - y, *font_size);
            }
        }
    }
    let content_data = flate_compress(&content.finish());
    pdf.stream(content_id, &content_data)
        .filter(Filter::FlateDecode);

    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr("unionportal"));

    pdf.finish()
}

fn show_text(content: &mut Content, text: &str, x: f64, y: f64, font_size: f64) {
    let encoded = encode_win_ansi(text);
    content.set_fill_gray(0.0);
    content.begin_text();
    content.set_font(FONT_NAME, font_size as f32);
    content.next_line(x as f32, y as f32);
    content.show(Str(&encoded));
    content.end_text();
}

fn flate_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec never fails.
    encoder
        .write_all(data)
        .and_then(|()| encoder.finish())
        .unwrap_or_default()
}
