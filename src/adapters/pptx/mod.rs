mod extractor;
pub mod package;

use crate::core::model::Slide;
use crate::Result;
use std::io::{Read, Seek};

pub use extractor::PptxExtractor;
pub use package::{PptxPackage, Relationship};

pub trait PresentationExtractor {
    fn extract<R: Read + Seek>(&self, package: &mut PptxPackage<R>) -> Result<Vec<Slide>>;
}
