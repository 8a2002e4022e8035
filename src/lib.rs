//! Protein feature track normalisation and selection.
//!
//! Upstream feature and variation payloads go through evidence grouping,
//! variant repair, category ordering and position layout before they are
//! handed to a renderer; pointer interaction on the rendered tracks drives
//! the selection controller.

pub mod canvas;
pub mod categories;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod evidence;
pub mod fetch;
pub mod highlight;
pub mod pointer;
pub mod positions;
pub mod selection;
pub mod session;
pub mod variants;
pub mod viewer;

pub use protvista_protocol as protocol;

pub use categories::{group_features_by_category, process_proteomics, process_ungrouped_features};
pub use config::ViewerConfig;
pub use error::{ErrorCode, Result, ViewerError};
pub use positions::process_variants;
pub use session::Session;
pub use viewer::FeatureViewer;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
