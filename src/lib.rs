#![forbid(unsafe_code)]
//! An implementation of Dremel-style record shredding and assembly: columnar
//! storage for nested, repeated records built on repetition and definition
//! levels.
//!
//! The pipeline runs [`schema`] (the field graph records are shredded
//! against) through [`shred`] (record → per-leaf triples), [`column`]
//! (storage and readers vending those triples back out), [`scan`]
//! (streaming an aligned projection of columns without assembling records)
//! and [`assembly`] (driving the full set of columns back into records).

#[macro_use]
pub mod error;
pub mod assembly;
pub mod column;
pub mod node;
pub mod record;
pub mod scan;
pub mod schema;
pub mod shred;

pub use error::{DremelError, Result};
