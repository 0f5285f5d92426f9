use super::model::{ImageInfo, ImagePart, ShapeKind};
use std::path::PathBuf;

/// Everything printed about one presentation, already derived and truncated.
#[derive(Debug, Clone, Default)]
pub struct PresentationReport {
    pub path: PathBuf,
    pub slides: Vec<SlideReport>,
}

#[derive(Debug, Clone, Default)]
pub struct SlideReport {
    pub number: usize,
    pub title: Option<String>,
    pub layout: Option<String>,
    pub shapes: Vec<ShapeLine>,
    pub notes: Option<String>,
    pub images: Vec<ImagePart>,
}

#[derive(Debug, Clone)]
pub struct ShapeLine {
    /// 1-based position within the slide.
    pub index: usize,
    pub kind: ShapeKind,
    pub is_title: bool,
    pub placeholder_idx: Option<u32>,
    pub text: Option<String>,
    pub picture: Option<PictureDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureDescriptor {
    Image(ImageInfo),
    Unreadable,
}
