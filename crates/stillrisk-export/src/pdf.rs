use std::io::Cursor;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect, Rgb,
};
use tracing::{debug, warn};

use crate::error::ExportError;
use crate::layout::{text_width, Anchor, DrawOp, PageLayout};
use crate::shaping::contains_arabic;
use crate::styles::Color;

/// Font used to paint report text.
#[derive(Debug, Clone, Copy, Default)]
pub enum ReportFont<'a> {
    /// Built-in Helvetica. Has no Arabic glyphs.
    #[default]
    Helvetica,
    /// A TrueType font embedded into the document.
    Embedded(&'a [u8]),
}

fn pdf_color(color: Color) -> printpdf::Color {
    let (r, g, b) = color.unit();
    printpdf::Color::Rgb(Rgb::new(r, g, b, None))
}

fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

/// Paint a laid-out page into a PDF document.
pub fn render_pdf(layout: &PageLayout, font: ReportFont<'_>) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new(&layout.title, mm(layout.width), mm(layout.height), "Layer 1");

    let font_ref = match font {
        ReportFont::Embedded(bytes) => doc.add_external_font(Cursor::new(bytes))?,
        ReportFont::Helvetica => {
            if layout.texts().any(contains_arabic) {
                warn!("no Arabic-capable font configured, Arabic text will not render correctly");
            }
            doc.add_builtin_font(BuiltinFont::Helvetica)?
        }
    };

    let canvas = doc.get_page(page).get_layer(layer);
    for op in &layout.ops {
        paint(&canvas, &font_ref, op);
    }

    let bytes = doc.save_to_bytes()?;
    debug!(bytes = bytes.len(), ops = layout.ops.len(), "rendered PDF report");
    Ok(bytes)
}

fn paint(canvas: &PdfLayerReference, font: &IndirectFontRef, op: &DrawOp) {
    match op {
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            canvas.set_fill_color(pdf_color(*color));
            let rect = Rect::new(mm(*x), mm(*y), mm(x + width), mm(y + height))
                .with_mode(PaintMode::Fill);
            canvas.add_rect(rect);
        }
        DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            thickness,
        } => {
            canvas.set_outline_color(pdf_color(*color));
            canvas.set_outline_thickness(*thickness as f32);
            let rect = Rect::new(mm(*x), mm(*y), mm(x + width), mm(y + height))
                .with_mode(PaintMode::Stroke);
            canvas.add_rect(rect);
        }
        DrawOp::Line {
            from,
            to,
            color,
            thickness,
        } => {
            canvas.set_outline_color(pdf_color(*color));
            canvas.set_outline_thickness(*thickness as f32);
            canvas.add_line(Line {
                points: vec![
                    (Point::new(mm(from.0), mm(from.1)), false),
                    (Point::new(mm(to.0), mm(to.1)), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::Text {
            x,
            y,
            size,
            color,
            anchor,
            text,
        } => {
            let start = match anchor {
                Anchor::Start => *x,
                Anchor::Middle => x - text_width(text, *size) / 2.0,
                Anchor::End => x - text_width(text, *size),
            };
            canvas.set_fill_color(pdf_color(*color));
            canvas.use_text(text.as_str(), *size as f32, mm(start), mm(*y), font);
        }
    }
}
