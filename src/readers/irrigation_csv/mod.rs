//! Irrigation flow meter totals, as exported by the field station's
//! Campbell Scientific logger (TOA5 CSV).

mod parse;
mod select;

pub use parse::{parse_file, parse_reader, IrrigationRecords, ParseError};
pub use select::{no_file_message, select_file_to_load};
