//! Domain types for SignalScope

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{Series, SeriesMeta};
