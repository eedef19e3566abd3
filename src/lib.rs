//! Core library for the scoreboard-import command line application.
//!
//! The pipeline has two independent batch stages. Extraction reads a
//! workbook of per-person scoreboards ([`io`]) and infers attendance and
//! commitments from cell fills and status glyphs ([`extract`]), producing the
//! intermediate document described in [`model`]. Loading pushes that
//! document into a hosted REST datastore ([`load`]). [`sync`] wires the
//! stages to files and configuration.

pub mod config;
pub mod error;
pub mod extract;
pub mod io;
pub mod load;
pub mod model;
pub mod sync;

pub use error::{Result, ToolError};
