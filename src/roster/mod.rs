//! Spreadsheet boundary: reading roster sheets from CSV and writing results.
//!
//! Readers accept both the canonical English headers and the headers of the
//! HR system's Chinese-language exports. Writers always emit the English ones.

mod columns;
mod reader;
mod writer;

pub use reader::{
    FeeSheet, read_active_roster, read_fee_sheet, read_resigned_roster, read_transfer_log,
};
pub use writer::{write_fee_lines, write_periods};
