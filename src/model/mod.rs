//! Data models for annotation records.

mod annotation;

pub use annotation::{Annotation, Provenance};
