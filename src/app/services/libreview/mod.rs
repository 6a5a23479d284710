//! LibreView CSV parser for FreeStyle Libre exports
//!
//! LibreView exports open with a free-text banner line, followed by a
//! localised header row and 19 comma-separated columns per record.
//!
//! ## Architecture
//!
//! - [`detect`] - Banner/header splitting, unit detection and the FreeStyle signature check
//! - [`record`] - Typed 19-column row and its mapping to a canonical reading
//! - [`parser`] - Parse orchestration and validation
//!
//! ## Usage
//!
//! ```rust
//! use cgm_processor::app::services::libreview::LibreViewParser;
//!
//! # fn example(contents: &str) -> cgm_processor::Result<()> {
//! let result = LibreViewParser::new(2022).parse(contents)?;
//! println!("Parsed {} readings", result.readings.len());
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod parser;
pub mod record;

#[cfg(test)]
pub mod tests;

pub use parser::LibreViewParser;
pub use record::LibreViewRecord;
