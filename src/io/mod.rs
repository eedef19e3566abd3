//! Readers and writers for the two files the pipeline touches: the source
//! workbook and the intermediate JSON document.

pub mod document;
pub mod excel_read;
pub mod sheet;
pub mod styles;
