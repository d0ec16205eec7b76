//! Reporting and materialization of placements.

mod json;
pub mod materialize;
mod options;
mod result;
mod text;

pub use json::{to_json, JsonFormat};
pub use materialize::{
    FieldMaterializer, Plan, PlanPage, PreviewOverlay, Stroke, Widget, WidgetPlan, WidgetStyle,
};
pub use options::{MaterializeMode, PageSelection};
pub use result::{DocumentReport, FieldCounts, PageReport};
pub use text::to_text;
