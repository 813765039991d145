//! Explorer core for multi-dimensional simulation evaluation results.
//!
//! A results file declares parameter and objective columns in a metadata
//! header and packs vector-valued fields into comma-separated cells; the
//! loader normalizes it into a flat scalar table, and the selection filter
//! intersects per-parameter discrete ranges to decide which evaluations are
//! currently in view. A presentation layer consumes both through
//! [`Session`], which also carries the opaque-row-index launch seam.

pub mod data;
pub mod session;

pub use data::filter::{RangeError, SelectionFilter};
pub use data::loader::{load_results, parse_results, FormatError};
pub use data::model::{ArrayField, Dimensions, ResultsTable};
pub use session::{Axis, Session, SolutionLauncher};
