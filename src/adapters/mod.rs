//! Format adapters that turn a document package into the core model.

pub mod pptx;
