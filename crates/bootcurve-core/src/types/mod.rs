//! Domain types used across the workspace.

mod date;
mod frequency;

pub use date::Date;
pub use frequency::Frequency;
