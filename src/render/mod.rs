mod text;

use crate::core::report::PresentationReport;
use crate::Result;

pub use text::TextRenderer;

pub trait Renderer {
    fn render(&self, report: &PresentationReport) -> Result<String>;
}
