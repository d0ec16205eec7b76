//! Layout and placement model types.
//!
//! This module defines the types exchanged between the layout extractor,
//! the placement engine and the materializers. Everything here is plain
//! data: page-scoped, built once and never mutated after hand-off.

mod document;
mod field;
mod geometry;
mod page;
mod span;

pub use document::DocumentLayout;
pub use field::{FieldKind, FieldPlacement, PageTemplate};
pub use geometry::Rect;
pub use page::{PageLayout, MIN_INGEST_EXTENT};
pub use span::TextSpan;
