//! Core data model shared by the extractor and the renderer.

pub mod model;
pub mod report;
