use crate::core::report::{PictureDescriptor, PresentationReport, ShapeLine, SlideReport};
use crate::render::Renderer;
use crate::Result;

/// Plain-text report, one section per slide.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, report: &PresentationReport) -> Result<String> {
        let mut out = String::new();

        out.push_str(&format!("File: {}\n", report.path.display()));
        out.push_str(&format!("Slide count: {}\n\n", report.slides.len()));

        for slide in &report.slides {
            render_slide(slide, &mut out);
        }

        Ok(out)
    }
}

fn render_slide(slide: &SlideReport, out: &mut String) {
    out.push_str(&format!("--- Slide {} ---\n", slide.number));

    if let Some(title) = &slide.title {
        out.push_str(&format!("Title: {}\n", title));
    }
    if let Some(layout) = &slide.layout {
        out.push_str(&format!("Layout: {}\n", layout));
    }

    for shape in &slide.shapes {
        out.push_str(&shape_line(shape));
        out.push('\n');
    }

    if let Some(notes) = &slide.notes {
        out.push_str(&format!("Notes: {}\n", notes));
    }

    if !slide.images.is_empty() {
        out.push_str("Images in slide:\n");
        for image in &slide.images {
            let size = image
                .size
                .map(|size| size.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            out.push_str(&format!(
                " - {} ({}, {} bytes)\n",
                image.partname, image.content_type, size
            ));
        }
    }

    out.push('\n');
}

fn shape_line(shape: &ShapeLine) -> String {
    let mut line = format!("Shape {}: {}", shape.index, shape.kind);

    if shape.is_title {
        line.push_str(" [TITLE]");
    }
    if let Some(idx) = shape.placeholder_idx {
        line.push_str(&format!(" (placeholder idx={})", idx));
    }
    if let Some(text) = &shape.text {
        line.push_str(&format!(" | text='{}'", text));
    }
    match &shape.picture {
        Some(PictureDescriptor::Image(info)) => line.push_str(&format!(
            " | picture: {} ({} bytes, ext={})",
            info.filename, info.size, info.ext
        )),
        Some(PictureDescriptor::Unreadable) => {
            line.push_str(" | picture: (could not read image)")
        }
        None => {}
    }

    line
}
