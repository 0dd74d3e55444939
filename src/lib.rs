//! Calendar grid addressing: day offsets, grid positions, selection
//! queries and cell extents for multi-month calendar widgets.

pub mod a11y;
pub mod calendar;
pub mod config;
pub mod error;
pub mod query;
pub mod theme;

pub use error::{GridError, GridResult};
