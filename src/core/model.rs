//! Read-only view of a presentation: slides, shapes, notes and images.

use std::fmt;
use std::path::PathBuf;

/// Outcome of extracting an optional field.
///
/// `Absent` means the document simply does not carry the field.
/// `Malformed` means the field is there but could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    Present(T),
    Absent,
    Malformed(String),
}

impl<T> Extracted<T> {
    pub fn malformed_reason(&self) -> Option<&str> {
        match self {
            Extracted::Malformed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl<T, E: fmt::Display> From<std::result::Result<Option<T>, E>> for Extracted<T> {
    fn from(result: std::result::Result<Option<T>, E>) -> Self {
        match result {
            Ok(Some(value)) => Extracted::Present(value),
            Ok(None) => Extracted::Absent,
            Err(e) => Extracted::Malformed(e.to_string()),
        }
    }
}

/// A whole presentation in document order.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    pub path: PathBuf,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone)]
pub struct Slide {
    /// 1-based position in the slide list.
    pub number: usize,
    pub partname: String,
    /// Index into `shapes` of the first placeholder with `idx` 0.
    pub title: Option<usize>,
    pub layout_name: Extracted<String>,
    pub shapes: Vec<Shape>,
    /// Raw text of every text-bearing shape on the notes slide.
    pub notes: Extracted<Vec<String>>,
    pub related_images: Vec<ImagePart>,
}

impl Slide {
    pub fn title_shape(&self) -> Option<&Shape> {
        self.title.and_then(|idx| self.shapes.get(idx))
    }
}

#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub name: String,
    pub placeholder: Option<Placeholder>,
    /// `Some` iff the shape has a text frame, even when it is empty.
    pub text: Option<String>,
    /// `Some` iff the shape is a picture.
    pub image: Option<Extracted<ImageInfo>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// `Present(0)` when the `idx` attribute is omitted.
    pub idx: Extracted<u32>,
}

impl Placeholder {
    /// The slide title is the placeholder at index 0, whatever its type.
    pub fn is_title(&self) -> bool {
        self.idx == Extracted::Present(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    AutoShape,
    Chart,
    ContentPart,
    EmbeddedOleObject,
    Freeform,
    Group,
    IgxGraphic,
    Line,
    LinkedOleObject,
    Media,
    Picture,
    Placeholder,
    Table,
    TextBox,
    Other,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::AutoShape => "AUTO_SHAPE",
            ShapeKind::Chart => "CHART",
            ShapeKind::ContentPart => "CONTENT_PART",
            ShapeKind::EmbeddedOleObject => "EMBEDDED_OLE_OBJECT",
            ShapeKind::Freeform => "FREEFORM",
            ShapeKind::Group => "GROUP",
            ShapeKind::IgxGraphic => "IGX_GRAPHIC",
            ShapeKind::Line => "LINE",
            ShapeKind::LinkedOleObject => "LINKED_OLE_OBJECT",
            ShapeKind::Media => "MEDIA",
            ShapeKind::Picture => "PICTURE",
            ShapeKind::Placeholder => "PLACEHOLDER",
            ShapeKind::Table => "TABLE",
            ShapeKind::TextBox => "TEXT_BOX",
            ShapeKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image payload behind a picture shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// `image.<ext>`, where `ext` comes from the image part name.
    pub filename: String,
    pub size: u64,
    /// Format sniffed from the image bytes.
    pub ext: String,
}

/// A part related to a slide whose content type is an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub partname: String,
    pub content_type: String,
    /// `None` when the part bytes could not be read.
    pub size: Option<u64>,
}
