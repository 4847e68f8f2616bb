//! Selector modules. Each one turns user gestures into [`FilterEvent`]s and
//! never touches the filter state itself; the reducer in
//! [`crate::data::filter`] is the only writer.
//!
//! [`FilterEvent`]: crate::data::filter::FilterEvent

pub mod angular;
pub mod histogram;
pub mod linear;
pub mod scale;
pub mod seed;
pub mod year;

pub use angular::{AngularRangeSelector, ArcGeometry};
pub use linear::LinearRangeSelector;
pub use seed::SeedSelector;
pub use year::YearSelector;
