//! CGM Processor Library
//!
//! A Rust library for normalising continuous glucose monitor (CGM) exports
//! into a single time series of glucose readings in mmol/L.
//!
//! This library provides tools for:
//! - Parsing LibreView CSV exports (banner line, fixed 19-column schema)
//! - Parsing Dexcom Clarity CSV exports (binary preamble, BOM-damaged headers)
//! - Fetching entries from the Nightscout HTTP API with backwards pagination
//! - Unit detection and mg/dL to mmol/L conversion
//! - Year filtering with explicit accounting of skipped rows
//! - Daily time-in-range aggregation for reporting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod daily_aggregator;
        pub mod detection;
        pub mod dexcom;
        pub mod field_parsers;
        pub mod ingest;
        pub mod libreview;
        pub mod nightscout;
        pub mod stats;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{GlucoseUnit, ParseOptions, ParseResponse, Provider, Reading};
pub use app::services::stats::{ParseResult, ParseStats};
pub use config::Config;

/// Result type alias for the CGM processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for CGM ingestion
///
/// Every parser reports failure through this type rather than panicking.
/// The `Display` output is the human-readable message shown to the user.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// File content could not be extracted
    #[error("Unable to parse file '{path}': {reason}")]
    UnreadableFile { path: String, reason: String },

    /// Fewer qualifying rows than the provider minimum
    #[error(
        "Insufficient data found in provided {provider} file: {found} qualifying rows, at least {required} required"
    )]
    InsufficientData {
        provider: Provider,
        found: usize,
        required: usize,
    },

    /// Vendor signature check failed
    #[error(
        "Invalid or unknown data format. Did you choose the correct CGM provider? ({provider}: {reason})"
    )]
    UnknownFormat { provider: Provider, reason: String },

    /// Nightscout answered with a non-success status or an unusable body
    #[error("Unable to fetch data from Nightscout API: {message}")]
    NetworkFailure { message: String, status: Option<u16> },

    /// Nightscout could not be reached at all
    #[error(
        "Unable to fetch data from Nightscout API at {url}: {message}. Ensure that your Nightscout is reachable and correctly configured for cross-origin (CORS) requests"
    )]
    NetworkUnreachable { url: String, message: String },

    /// Pagination safety bound reached
    #[error("Exceeded max number of allowed calls to Nightscout ({requests} requests)")]
    RateLimitExceeded { requests: usize },

    /// Parsing invoked without a vendor
    #[error("No CGM provider selected")]
    NoProviderSelected,

    /// A single field could not be interpreted
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    /// CSV reader failure
    #[error("CSV parsing error: {message}")]
    CsvParsing {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an unreadable file error
    pub fn unreadable_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnreadableFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an insufficient data error
    pub fn insufficient_data(provider: Provider, found: usize, required: usize) -> Self {
        Self::InsufficientData {
            provider,
            found,
            required,
        }
    }

    /// Create an unknown format error
    pub fn unknown_format(provider: Provider, reason: impl Into<String>) -> Self {
        Self::UnknownFormat {
            provider,
            reason: reason.into(),
        }
    }

    /// Create a network failure error
    pub fn network_failure(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
            status,
        }
    }

    /// Create a network unreachable error carrying CORS guidance
    pub fn network_unreachable(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a rate limit exceeded error
    pub fn rate_limit_exceeded(requests: usize) -> Self {
        Self::RateLimitExceeded { requests }
    }

    /// Create an invalid field error
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::CsvParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Error class name as reported to callers
    pub fn message_class(&self) -> &'static str {
        match self {
            Self::UnreadableFile { .. } => "UnreadableFile",
            Self::InsufficientData { .. } => "InsufficientData",
            Self::UnknownFormat { .. } => "UnknownFormat",
            Self::NetworkFailure { .. } | Self::NetworkUnreachable { .. } => "NetworkFailure",
            Self::RateLimitExceeded { .. } => "RateLimitExceeded",
            Self::NoProviderSelected => "NoProviderSelected",
            Self::InvalidField { .. } => "InvalidField",
            Self::CsvParsing { .. } => "CsvParsing",
            Self::Configuration { .. } => "Configuration",
        }
    }
}
