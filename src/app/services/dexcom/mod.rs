//! Dexcom Clarity CSV parser
//!
//! Clarity exports may start with a binary preamble, sometimes carry a
//! byte-order mark damaged into the first header token, and label the
//! glucose column with the export unit.
//!
//! - [`detect`] - Preamble removal, header repair and unit detection
//! - [`record`] - Typed 14-column row and its mapping to a canonical reading
//! - [`parser`] - Parse orchestration and validation

pub mod detect;
pub mod parser;
pub mod record;

#[cfg(test)]
pub mod tests;

pub use parser::DexcomParser;
pub use record::DexcomRecord;
