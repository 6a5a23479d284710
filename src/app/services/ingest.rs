//! File ingestion and provider dispatch
//!
//! Reads export files, decodes their text and hands them to the parser for
//! the selected provider. Reading is the only suspension point; parsing is
//! synchronous once the bytes are in memory.

use std::path::Path;
use tracing::{debug, info};

use crate::app::models::Provider;
use crate::app::services::dexcom::DexcomParser;
use crate::app::services::libreview::LibreViewParser;
use crate::app::services::stats::ParseResult;
use crate::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode export bytes as UTF-8, falling back to Windows-1252 (Latin-1)
pub fn decode_contents(label: &str, bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("{} is not valid UTF-8; decoding as Windows-1252", label);
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    };

    if text.trim().is_empty() {
        return Err(Error::unreadable_file(label, "file is empty"));
    }

    Ok(text)
}

/// Read an export file into memory
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::unreadable_file(path.display().to_string(), e.to_string()))?;

    if bytes.is_empty() {
        return Err(Error::unreadable_file(
            path.display().to_string(),
            "file is empty",
        ));
    }

    Ok(bytes)
}

/// Parse in-memory export bytes with the given provider
///
/// `source` names the export in error messages.
pub fn parse_contents(
    provider: Option<Provider>,
    source: &str,
    bytes: &[u8],
    year: i32,
) -> Result<ParseResult> {
    match provider.ok_or(Error::NoProviderSelected)? {
        Provider::LibreView => {
            let text = decode_contents(source, bytes)?;
            LibreViewParser::new(year).parse(&text)
        }
        Provider::Dexcom => DexcomParser::new(year)
            .with_source(source)
            .parse_bytes(bytes),
        Provider::Nightscout => Err(Error::configuration(
            "Nightscout data is fetched from the server API, not parsed from a file",
        )),
    }
}

/// Read and parse an export file with the given provider
pub async fn parse_file(provider: Option<Provider>, path: &Path, year: i32) -> Result<ParseResult> {
    let provider = provider.ok_or(Error::NoProviderSelected)?;
    info!("Parsing {} export: {}", provider, path.display());

    let bytes = read_file(path).await?;
    parse_contents(Some(provider), &path.display().to_string(), &bytes, year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_utf8_with_bom() {
        let text = decode_contents("test", b"\xEF\xBB\xBFIndex,Timestamp").unwrap();
        assert_eq!(text, "Index,Timestamp");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "Glykämie" in Latin-1
        let text = decode_contents("test", b"Glyk\xE4mie,mmol/L").unwrap();
        assert_eq!(text, "Glykämie,mmol/L");
    }

    #[test]
    fn test_decode_empty_is_unreadable() {
        let err = decode_contents("test", b"  \n ").unwrap_err();
        assert_eq!(err.message_class(), "UnreadableFile");
    }

    #[test]
    fn test_parse_contents_without_provider() {
        let err = parse_contents(None, "test", b"anything", 2022).unwrap_err();
        assert_eq!(err.message_class(), "NoProviderSelected");
    }

    #[test]
    fn test_parse_contents_rejects_nightscout() {
        let err = parse_contents(Some(Provider::Nightscout), "test", b"anything", 2022).unwrap_err();
        assert_eq!(err.message_class(), "Configuration");
    }

    #[tokio::test]
    async fn test_parse_file_missing() {
        let err = parse_file(
            Some(Provider::LibreView),
            Path::new("/definitely/not/here.csv"),
            2022,
        )
        .await
        .unwrap_err();
        assert_eq!(err.message_class(), "UnreadableFile");
    }

    #[tokio::test]
    async fn test_parse_file_empty() {
        let temp_file = NamedTempFile::new().unwrap();
        let err = parse_file(Some(Provider::Dexcom), temp_file.path(), 2022)
            .await
            .unwrap_err();
        assert_eq!(err.message_class(), "UnreadableFile");
    }

    #[tokio::test]
    async fn test_preamble_only_dexcom_file_reports_its_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let mut preamble = vec![0x01u8];
        preamble.extend(std::iter::repeat_n(0x20u8, 101));
        temp_file.write_all(&preamble).unwrap();

        let err = parse_file(Some(Provider::Dexcom), temp_file.path(), 2022)
            .await
            .unwrap_err();

        assert_eq!(err.message_class(), "UnreadableFile");
        let path = temp_file.path().display().to_string();
        assert!(
            matches!(&err, Error::UnreadableFile { path: p, .. } if *p == path),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_blank_libreview_contents_report_source() {
        let err = parse_contents(Some(Provider::LibreView), "/data/libre.csv", b" \r\n", 2022)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to parse file '/data/libre.csv': file is empty"
        );
    }

    #[tokio::test]
    async fn test_parse_file_no_provider_before_reading() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "banner").unwrap();

        let err = parse_file(None, temp_file.path(), 2022).await.unwrap_err();
        assert_eq!(err.message_class(), "NoProviderSelected");
    }
}
