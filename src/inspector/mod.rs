//! Slide-by-slide inspection of a presentation.

mod text;

use crate::adapters::pptx::{PptxExtractor, PptxPackage, PresentationExtractor};
use crate::core::model::{Extracted, Presentation, Shape, Slide};
use crate::core::report::{PictureDescriptor, PresentationReport, ShapeLine, SlideReport};
use crate::render::{Renderer, TextRenderer};
use crate::{InspectOptions, Result};
use std::path::Path;

pub use self::text::{normalize, snippet, truncate};

const NOTES_SEPARATOR: &str = " | ";

/// Opens presentations and produces the human-readable slide summary.
pub struct PresentationInspector {
    options: InspectOptions,
}

impl PresentationInspector {
    /// Creates a new inspector with the given options.
    pub fn new(options: InspectOptions) -> Self {
        Self { options }
    }

    /// Creates a new inspector with default options.
    pub fn with_defaults() -> Self {
        Self::new(InspectOptions::default())
    }

    /// Opens `path` and returns its summary.
    ///
    /// Only failures to open the document are returned as errors; fields
    /// that are missing or unreadable are left out of the summary.
    pub fn inspect<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let presentation = self.open(path)?;
        self.summarize(&presentation)
    }

    /// Reads the slide model of the presentation at `path`.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<Presentation> {
        let path = path.as_ref();
        let mut package = PptxPackage::open(path)?;
        let slides = PptxExtractor.extract(&mut package)?;
        log::debug!("{}: {} slides", path.display(), slides.len());

        Ok(Presentation {
            path: path.to_path_buf(),
            slides,
        })
    }

    /// Renders the summary of an already opened presentation.
    pub fn summarize(&self, presentation: &Presentation) -> Result<String> {
        TextRenderer.render(&self.report(presentation))
    }

    pub fn report(&self, presentation: &Presentation) -> PresentationReport {
        PresentationReport {
            path: presentation.path.clone(),
            slides: presentation
                .slides
                .iter()
                .map(|slide| self.slide_report(slide))
                .collect(),
        }
    }

    fn slide_report(&self, slide: &Slide) -> SlideReport {
        let title = slide
            .title_shape()
            .and_then(|shape| shape.text.as_deref())
            .map(normalize)
            .filter(|title| !title.is_empty());

        let layout = match &slide.layout_name {
            Extracted::Present(name) if !name.is_empty() => Some(name.clone()),
            Extracted::Malformed(reason) => {
                log::warn!("{}: unreadable layout: {}", slide.partname, reason);
                None
            }
            _ => None,
        };

        let shapes = slide
            .shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| self.shape_line(slide, i, shape))
            .collect();

        SlideReport {
            number: slide.number,
            title,
            layout,
            shapes,
            notes: self.notes(slide),
            images: slide.related_images.clone(),
        }
    }

    fn shape_line(&self, slide: &Slide, position: usize, shape: &Shape) -> ShapeLine {
        let placeholder_idx = shape.placeholder.as_ref().and_then(|ph| match &ph.idx {
            Extracted::Present(idx) => Some(*idx),
            Extracted::Malformed(reason) => {
                log::warn!(
                    "{}: shape {:?}: {}",
                    slide.partname,
                    shape.name,
                    reason
                );
                None
            }
            Extracted::Absent => None,
        });

        let picture = shape.image.as_ref().map(|image| match image {
            Extracted::Present(info) => PictureDescriptor::Image(info.clone()),
            other => {
                if let Some(reason) = other.malformed_reason() {
                    log::warn!(
                        "{}: shape {:?}: could not read image: {}",
                        slide.partname,
                        shape.name,
                        reason
                    );
                }
                PictureDescriptor::Unreadable
            }
        });

        ShapeLine {
            index: position + 1,
            kind: shape.kind,
            is_title: slide.title == Some(position),
            placeholder_idx,
            text: shape
                .text
                .as_deref()
                .map(|text| snippet(&normalize(text), self.options.text_limit)),
            picture,
        }
    }

    fn notes(&self, slide: &Slide) -> Option<String> {
        let texts = match &slide.notes {
            Extracted::Present(texts) => texts,
            Extracted::Malformed(reason) => {
                log::warn!("{}: unreadable notes: {}", slide.partname, reason);
                return None;
            }
            Extracted::Absent => return None,
        };

        let joined = texts
            .iter()
            .map(|text| normalize(text))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(NOTES_SEPARATOR);
        let notes = truncate(&joined, self.options.notes_limit);
        (!notes.is_empty()).then_some(notes)
    }
}
